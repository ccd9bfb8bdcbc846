//! Logging setup.
//!
//! Installs a global `tracing` subscriber from [`LoggingConfig`]. `RUST_LOG`
//! overrides the configured level when set.

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// Failed to install the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The level filter did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already set.
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Build the level filter for a configuration.
///
/// # Errors
///
/// Returns [`LoggingError::Filter`] if `RUST_LOG` is set but malformed.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => {
            EnvFilter::try_new(directives).map_err(|e| LoggingError::Filter(e.to_string()))
        },
        Err(_) => Ok(EnvFilter::new(config.level.to_string())),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if the filter is malformed or a subscriber is already
/// installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;
    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))
}
