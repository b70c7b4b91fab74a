//! Logging setup for processes hosting the filter.
//!
//! The library only emits `tracing` events; the host decides where they go by
//! calling [`init_logging`] once at start-up.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_level` (e.g. the configured `guardian.log_level`).
///
/// Returns `false` when a global subscriber was already installed, which is
/// not an error: hosts and test harnesses may both try to initialise logging.
pub fn init_logging(default_level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
