//! Configuration for the client session

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for one board session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Signed-in account id; `None` makes the session read-only
    /// (writes become silent no-ops)
    pub account_id: Option<String>,

    /// Maximum edits per draw transaction (default: 100)
    pub batch_size: usize,

    /// Maximum row indices per `get_lines` request (default: 10)
    pub lines_per_fetch: usize,

    /// Debounce before an under-filled batch is flushed anyway
    /// (default: 500ms)
    pub flush_debounce: Duration,

    /// Board poll interval (default: 1s)
    pub poll_interval: Duration,

    /// Polling stops this long after the last user edit; the next
    /// edit restarts it (default: 10 minutes)
    pub max_session: Duration,

    /// Consecutive draw failures before the queue is dropped
    /// (default: 3)
    pub max_submit_failures: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            batch_size: 100,
            lines_per_fetch: 10,
            flush_debounce: Duration::from_millis(500),
            poll_interval: Duration::from_secs(1),
            max_session: Duration::from_secs(10 * 60),
            max_submit_failures: 3,
        }
    }
}

impl ClientConfig {
    /// Load config from TOML file
    pub fn from_toml(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        if self.lines_per_fetch == 0 {
            anyhow::bail!("lines_per_fetch must be at least 1");
        }
        if self.max_submit_failures == 0 {
            anyhow::bail!("max_submit_failures must be at least 1");
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be non-zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_batch() {
        let config = ClientConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_group_size() {
        let config = ClientConfig {
            lines_per_fetch: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
