//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SEQAUDIT_LOG";

/// Install a formatted subscriber filtered by `SEQAUDIT_LOG`, falling back to
/// `default_directive`. Returns false when a global subscriber already exists.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
