//! Log subscriber setup for the calculator CLI
//!
//! Logs always go to stderr so that stdout carries nothing but the result.

use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_LOG_FILTER};

/// Build the filter for `config`, falling back to the default directive when
/// the configured one does not parse.
pub fn build_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_new(&config.log_filter).unwrap_or_else(|error| {
        eprintln!(
            "Warning: invalid log filter '{}' ({}), using '{}'",
            config.log_filter, error, DEFAULT_LOG_FILTER
        );
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &Config) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(config))
        .with_ansi(config.log_ansi)
        .with_target(false)
        .try_init();
}
