//! Row wire format decoding
//!
//! A row travels as a base64 blob of exactly `4 + 8 * BOARD_WIDTH`
//! bytes: a 4-byte header (ignored), then one record per cell of
//! u32 little-endian color followed by u32 little-endian owner index.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pixel_common::{BoardError, Result, BYTES_PER_CELL, EXPECTED_LINE_LEN, LINE_HEADER_LEN};
use serde::{Deserialize, Serialize};

/// One cell of the board as stored by the ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// 24-bit packed RGB color
    pub color: u32,
    /// Account index of the last painter; 0 means unowned/background
    pub owner_index: u32,
}

/// Decode a raw row blob into its cells
///
/// Pure and total: the same input always yields the same output, and
/// every input either decodes fully or fails with `MalformedRow`.
pub fn decode_line(raw: &[u8]) -> Result<Vec<Cell>> {
    if raw.len() != EXPECTED_LINE_LEN {
        return Err(BoardError::MalformedRow {
            actual: raw.len(),
            expected: EXPECTED_LINE_LEN,
        });
    }

    let cells = raw[LINE_HEADER_LEN..]
        .chunks_exact(BYTES_PER_CELL)
        .map(|rec| Cell {
            color: u32::from_le_bytes([rec[0], rec[1], rec[2], rec[3]]),
            owner_index: u32::from_le_bytes([rec[4], rec[5], rec[6], rec[7]]),
        })
        .collect();

    Ok(cells)
}

/// Decode a base64-encoded row blob as returned by `get_lines`
pub fn decode_line_b64(encoded: &str) -> Result<Vec<Cell>> {
    let raw = BASE64.decode(encoded)?;
    decode_line(&raw)
}
