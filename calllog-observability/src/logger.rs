//! Process-wide `tracing` subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level when set. Output
//! goes to stderr so rendered records on stdout stay clean.

use calllog_core::{LogConfig, LogFormat};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Subscriber already initialized")]
    AlreadyInitialized,
    #[error("Failed to install subscriber: {0}")]
    Install(String),
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<(), LogInitError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };
    let registry = tracing_subscriber::registry().with(filter);
    let dispatcher_was_set = tracing::dispatcher::has_been_set();

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| {
        // try_init also installs the `log` bridge, which can fail on its own
        // after our dispatcher went in.
        if dispatcher_was_set {
            LogInitError::AlreadyInitialized
        } else {
            LogInitError::Install(e.to_string())
        }
    })
}

/// Parse an `EnvFilter` directive string.
pub fn build_filter(level: &str) -> Result<EnvFilter, LogInitError> {
    EnvFilter::try_new(level).map_err(|e| LogInitError::InvalidFilter(e.to_string()))
}
