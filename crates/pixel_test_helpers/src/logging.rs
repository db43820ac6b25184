//! Tracing setup for the test suites
//!
//! The global subscriber can only be installed once per process, so
//! every test funnels through a [`Once`] guard here; whichever test
//! runs first wins and later calls are no-ops. `RUST_LOG` overrides
//! the level a test asks for.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-writer subscriber at the given level
///
/// # Example
///
/// ```
/// use pixel_test_helpers::logging::init_test_logging;
///
/// init_test_logging("debug");
/// tracing::debug!("visible when this test fails");
/// ```
pub fn init_test_logging(level: &str) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .finish();

        // A second installation attempt is harmless noise.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Keep test output clean: only errors get through
pub fn suppress_logs() {
    init_test_logging("error");
}
