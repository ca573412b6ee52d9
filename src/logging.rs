//! Log output setup.
//!
//! The client emits [`tracing`] events. Applications that don't install a
//! subscriber of their own can call [`init`] to get formatted output on
//! stderr, filtered by `RUST_LOG` when set.

use tracing_subscriber::EnvFilter;

use crate::config::ClientConfig;

/// Default filter directive for `config`.
///
/// With `verbose_log` off only warnings and errors are shown.
pub fn default_directive(config: &ClientConfig) -> &'static str {
    if config.verbose_log {
        "info"
    } else {
        "warn"
    }
}

/// Install a global fmt subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
