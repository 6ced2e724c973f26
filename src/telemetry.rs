//! Tracing setup for embedding binaries and test harnesses.
//!
//! The engine only emits `tracing` events (loader skips, cascade warnings);
//! [`init`] installs a compact stderr subscriber for them. `RUST_LOG` wins
//! over the configured level when set.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("'{value}' is not a valid log filter")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("unable to install the tracing subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. Returns an error if the configured level
/// does not parse or a subscriber is already in place.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
            value: config.log_level.clone(),
            source,
        })
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
