//! Logging initialization.
//!
//! Diagnostics go to stderr through `tracing-subscriber`, leaving stdout for
//! the terminal summary.

use crate::error::ReportError;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level` when it is set. Must be
/// called once, before any tracing macros fire.
pub fn init_tracing(default_level: &str) -> Result<(), ReportError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| ReportError::Logging(format!("invalid log level '{}': {}", default_level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ReportError::Logging(e.to_string()))
}
