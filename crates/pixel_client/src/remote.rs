//! Remote ledger surface
//!
//! The contract exposes a handful of view methods and one change
//! method; everything behind them (transport, signing, gas) is the
//! implementor's concern. The store does not deduplicate retried
//! draws; the client's own failure cutoff is the only retry bound.

use crate::account::{AccountRecord, RemoteConfig};
use pixel_common::Result;
use serde::{Deserialize, Serialize};

/// One fully-resolved cell edit, as submitted to the ledger
///
/// The color is final: any alpha compositing already happened against
/// the background known at enqueue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub x: u32,
    pub y: u32,
    pub color: u32,
}

/// The ledger's board contract
///
/// All methods are suspension points; local state mutation around them
/// is synchronous. Implementations map transport-level failures to
/// `FetchFailed`/`SubmitFailed`.
#[allow(async_fn_in_trait)]
pub trait RemoteBoard {
    /// Current version of every row, in row order
    async fn get_line_versions(&self) -> Result<Vec<u64>>;

    /// Base64 row blobs for the requested indices, same order
    async fn get_lines(&self, rows: &[usize]) -> Result<Vec<String>>;

    /// Submit a batch of pixel edits
    async fn draw(&self, pixels: &[Edit]) -> Result<()>;

    /// Account record by id, `None` if never seen by the contract
    async fn get_account(&self, account_id: &str) -> Result<Option<AccountRecord>>;

    /// Account record by contract-assigned index
    async fn get_account_by_index(&self, index: u32) -> Result<Option<AccountRecord>>;

    /// Deployment-wide contract configuration
    async fn get_config(&self) -> Result<RemoteConfig>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_wire_shape() {
        // The contract's draw argument is a list of {x, y, color}.
        let edit = Edit {
            x: 3,
            y: 4,
            color: 0x112233,
        };
        let value = serde_json::to_value(edit).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "x": 3, "y": 4, "color": 0x112233 })
        );
    }
}
