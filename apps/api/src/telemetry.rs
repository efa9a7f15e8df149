//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,freight=debug,sqlx=warn";

/// Installs the global fmt subscriber.
///
/// ## Log Levels
/// - ERROR: unclassified storage failures
/// - WARN: rejected credentials, ownership violations
/// - INFO: completed commands (counts, elapsed time), schema migrations
/// - DEBUG: repository queries and search filters
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
