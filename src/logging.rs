// src/logging.rs
//
// Logging bootstrap for tests.

use env_logger::Builder;

/// Initialize env_logger in test mode. Safe to call from every test; only
/// the first call takes effect.
pub fn init_test_logging() {
    Builder::new().parse_default_env().is_test(true).try_init().ok();
}
