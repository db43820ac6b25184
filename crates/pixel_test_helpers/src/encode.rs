//! Row blob encoders, the inverse of `pixel_core::codec`
//!
//! Only tests need to produce wire blobs; the production client only
//! ever decodes them.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pixel_common::LINE_HEADER_LEN;
use pixel_core::codec::Cell;

/// Encode cells into a raw row blob (4-byte zero header + LE records)
pub fn encode_line_raw(cells: &[Cell]) -> Vec<u8> {
    let mut raw = vec![0u8; LINE_HEADER_LEN];
    for cell in cells {
        raw.extend_from_slice(&cell.color.to_le_bytes());
        raw.extend_from_slice(&cell.owner_index.to_le_bytes());
    }
    raw
}

/// Encode cells into the base64 form served by `get_lines`
pub fn encode_line(cells: &[Cell]) -> String {
    BASE64.encode(encode_line_raw(cells))
}
