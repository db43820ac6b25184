//! Account records and contract configuration
//!
//! Wire records carry u128 token balances as decimal strings; the
//! display-side stats divide them down to whole-pixel units.

use chrono::{DateTime, Utc};
use pixel_common::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// Token units per pixel; balances on the wire are multiples of this
pub const PIXEL_COST: f64 = 1e18;

/// Account record as returned by the contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub account_index: u32,
    pub ft_balance: String,
    pub l_balance: String,
    pub num_pixels: u32,
}

/// Read-only account snapshot in display units
#[derive(Debug, Clone, PartialEq)]
pub struct AccountStats {
    pub account_id: String,
    /// Contract-assigned index; `None` for accounts the contract has
    /// never seen
    pub account_index: Option<u32>,
    pub ft_balance: f64,
    pub l_balance: f64,
    pub num_pixels: u32,
    pub fetched_at: DateTime<Utc>,
}

impl AccountStats {
    /// Build stats from an optional wire record
    ///
    /// A missing record becomes the zeroed default for `account_id`,
    /// so a fresh account renders as empty rather than erroring.
    pub fn from_record(record: Option<AccountRecord>, account_id: &str) -> Self {
        match record {
            Some(rec) => Self {
                account_id: rec.account_id,
                account_index: Some(rec.account_index),
                ft_balance: rec.ft_balance.parse::<f64>().unwrap_or(0.0) / PIXEL_COST,
                l_balance: rec.l_balance.parse::<f64>().unwrap_or(0.0) / PIXEL_COST,
                num_pixels: rec.num_pixels,
                fetched_at: Utc::now(),
            },
            None => Self {
                account_id: account_id.to_string(),
                account_index: None,
                ft_balance: 0.0,
                l_balance: 0.0,
                num_pixels: 0,
                fetched_at: Utc::now(),
            },
        }
    }
}

/// Contract configuration as returned by `get_config`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub app_account_id: String,
    pub ft_account_id: String,
    pub app_liquidity_denominator: String,
    pub pixel_coef_denominator: String,
    pub draw_fee_denominator: String,
}

/// Resolved contract configuration with denominators inverted
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub app_account_id: String,
    pub ft_account_id: String,
    pub app_liquidity: f64,
    pub pixel_coef: f64,
    pub draw_fee: f64,
}

impl AppConfig {
    pub fn resolve(remote: RemoteConfig) -> Result<Self> {
        let fraction = |name: &str, raw: &str| -> Result<f64> {
            let denominator: f64 = raw
                .parse()
                .map_err(|_| BoardError::BadConfig(format!("{name} is not a number: {raw:?}")))?;
            if denominator <= 0.0 {
                return Err(BoardError::BadConfig(format!(
                    "{name} must be positive, got {raw:?}"
                )));
            }
            Ok(1.0 / denominator)
        };

        Ok(Self {
            app_liquidity: fraction("app_liquidity_denominator", &remote.app_liquidity_denominator)?,
            pixel_coef: fraction("pixel_coef_denominator", &remote.pixel_coef_denominator)?,
            draw_fee: fraction("draw_fee_denominator", &remote.draw_fee_denominator)?,
            app_account_id: remote.app_account_id,
            ft_account_id: remote.ft_account_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_record_wire_shape() {
        // Field names match the contract's JSON view output.
        let record: AccountRecord = serde_json::from_value(serde_json::json!({
            "account_id": "alice.test",
            "account_index": 4,
            "ft_balance": "1000000000000000000",
            "l_balance": "0",
            "num_pixels": 9,
        }))
        .unwrap();
        assert_eq!(record.account_index, 4);
        assert_eq!(record.num_pixels, 9);
    }

    #[test]
    fn test_stats_from_record() {
        let stats = AccountStats::from_record(
            Some(AccountRecord {
                account_id: "alice.test".to_string(),
                account_index: 4,
                ft_balance: "2500000000000000000".to_string(),
                l_balance: "0".to_string(),
                num_pixels: 17,
            }),
            "alice.test",
        );
        assert_eq!(stats.account_index, Some(4));
        assert!((stats.ft_balance - 2.5).abs() < 1e-9);
        assert_eq!(stats.l_balance, 0.0);
        assert_eq!(stats.num_pixels, 17);
    }

    #[test]
    fn test_stats_from_missing_record() {
        let stats = AccountStats::from_record(None, "new.test");
        assert_eq!(stats.account_id, "new.test");
        assert_eq!(stats.account_index, None);
        assert_eq!(stats.ft_balance, 0.0);
        assert_eq!(stats.num_pixels, 0);
    }

    #[test]
    fn test_app_config_resolves_fractions() {
        let config = AppConfig::resolve(RemoteConfig {
            app_account_id: "app.test".to_string(),
            ft_account_id: "ft.test".to_string(),
            app_liquidity_denominator: "2".to_string(),
            pixel_coef_denominator: "4".to_string(),
            draw_fee_denominator: "10".to_string(),
        })
        .unwrap();
        assert_eq!(config.app_liquidity, 0.5);
        assert_eq!(config.pixel_coef, 0.25);
        assert_eq!(config.draw_fee, 0.1);
    }

    #[test]
    fn test_app_config_rejects_bad_denominator() {
        let remote = RemoteConfig {
            app_account_id: "app.test".to_string(),
            ft_account_id: "ft.test".to_string(),
            app_liquidity_denominator: "zero".to_string(),
            pixel_coef_denominator: "4".to_string(),
            draw_fee_denominator: "10".to_string(),
        };
        assert!(AppConfig::resolve(remote).is_err());
    }
}
