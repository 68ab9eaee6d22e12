//! Tracing setup for movienight.
//!
//! ```ignore
//! use movienight_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::cli())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Crate targets covered by the default filter.
const TARGETS: &[&str] = &[
    "movienight",
    "movienight_core",
    "movienight_providers",
    "movienight_client",
];

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The level applied to movienight crates when RUST_LOG is not set
    pub default_level: Level,
    /// Whether to include file/line information
    pub include_location: bool,
    pub include_timestamp: bool,
}

impl TracingConfig {
    /// Quiet config for normal CLI runs: warnings only, no timestamps.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            default_level: Level::WARN,
            include_location: false,
            include_timestamp: false,
        }
    }

    /// Verbose config for `--debug`.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            include_location: true,
            include_timestamp: true,
        }
    }

    /// The filter directive used when RUST_LOG is not set.
    pub fn default_directive(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.default_level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::cli()
    }
}

/// Initialize tracing with the given configuration.
///
/// Call once at startup. `RUST_LOG` overrides the default level.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the env filter directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.default_directive()))?;

    let layer = fmt::layer()
        .compact()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_writer(std::io::stderr);
    let layer = if config.include_timestamp {
        layer.boxed()
    } else {
        layer.without_time().boxed()
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
