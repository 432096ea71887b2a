//! Structured logging via `tracing`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `gitdoc_text=debug`
pub const LOG_ENV_VAR: &str = "GITDOC_LOG";

/// Install the global fmt subscriber
///
/// The filter comes from `GITDOC_LOG`, then `RUST_LOG`, then `default_level`.
/// Calling this more than once leaves the first subscriber in place.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init();
}
