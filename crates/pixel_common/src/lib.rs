//! Common types and errors for the pixel board client
//!
//! This crate provides the shared error taxonomy and board constants
//! used across all pixelboard components.

use thiserror::Error;

/// Board width in cells. Fixed for the lifetime of a deployment.
pub const BOARD_WIDTH: usize = 50;

/// Board height in cells (number of independently versioned rows).
pub const BOARD_HEIGHT: usize = 50;

/// Bytes of ignored header at the start of every encoded row blob.
pub const LINE_HEADER_LEN: usize = 4;

/// Bytes per cell on the wire: u32 LE color followed by u32 LE owner index.
pub const BYTES_PER_CELL: usize = 8;

/// Exact byte length of a well-formed row blob.
pub const EXPECTED_LINE_LEN: usize = LINE_HEADER_LEN + BYTES_PER_CELL * BOARD_WIDTH;

/// Core error types for board operations
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("row blob has length {actual}, expected {expected}")]
    MalformedRow { actual: usize, expected: usize },

    #[error("row blob is not valid base64: {0}")]
    BadEncoding(#[from] base64::DecodeError),

    #[error("board fetch failed: {0}")]
    FetchFailed(String),

    #[error("draw submission failed: {0}")]
    SubmitFailed(String),

    #[error("not signed in")]
    Unauthorized,

    #[error("invalid remote config: {0}")]
    BadConfig(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BoardError>;
