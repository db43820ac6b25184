//! Shared test utilities for pixelboard test suites
//!
//! # Modules
//!
//! - [`mock`]: in-memory [`MockRemote`] ledger with scripted failures
//! - [`encode`]: row blob encoders (the inverse of the client codec)
//! - [`logging`]: test logging configuration
//!
//! # Example
//!
//! ```rust
//! use pixel_test_helpers::prelude::*;
//!
//! fn my_test() {
//!     suppress_logs();
//!     let remote = MockRemote::new();
//!     remote.paint(3, 4, 0x112233, 1);
//!     // drive a Session or SyncEngine against `remote`
//! }
//! ```

pub mod encode;
pub mod logging;
pub mod mock;

pub use mock::MockRemote;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::encode::{encode_line, encode_line_raw};
    pub use crate::logging::{init_test_logging, suppress_logs};
    pub use crate::mock::MockRemote;
}
