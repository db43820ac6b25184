//! # Pixelboard core
//!
//! Pure, synchronous board model: row decoding, color compositing and
//! the local board store with its optimistic pending overlay. No I/O,
//! no async; everything here is driven by the client crate.

pub mod board;
pub mod codec;
pub mod color;

pub use board::{BoardStore, OwnerStanding};
pub use codec::{decode_line, decode_line_b64, Cell};
pub use color::{channels, color_hex, color_hex_alpha, composite, image_pixel_color, pack_color};

pub use pixel_common::{BOARD_HEIGHT, BOARD_WIDTH, EXPECTED_LINE_LEN};
