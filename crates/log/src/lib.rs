//! Logger initialization for Flowsint worker processes.
//!
//! A run's structured fields (`sketch_id`, `scan_id`, `node_id`, `branch_id`)
//! are attached by callers via `tracing::info_span!`/`#[tracing::instrument]`
//! at the call site; this crate only owns subscriber setup so every binary
//! (the API server, the worker, the CLI) configures logging identically.

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format for the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable, ANSI-colored — suitable for a local terminal.
    Pretty,
    /// Newline-delimited JSON — suitable for log aggregation.
    Json,
}

/// Logger configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive string, e.g. `"info,flowsint=debug"`.
    pub filter: String,
    /// Output format.
    pub format: Format,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: Format::Pretty,
        }
    }
}

impl Config {
    /// Build a config from the `RUST_LOG` environment variable, falling back
    /// to `"info"` when unset, and `FLOWSINT_LOG_FORMAT=json` to switch to
    /// JSON output.
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = match std::env::var("FLOWSINT_LOG_FORMAT").as_deref() {
            Ok("json") => Format::Json,
            _ => Format::Pretty,
        };
        Self { filter, format }
    }
}

/// Error initializing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The filter directive string failed to parse.
    #[error("invalid log filter {filter:?}: {source}")]
    Filter {
        /// The offending filter string.
        filter: String,
        /// Underlying parse error.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// A global subscriber was already installed.
    #[error("global subscriber already set")]
    AlreadyInitialized,
}

impl From<LogError> for flowsint_error::FlowError {
    fn from(err: LogError) -> Self {
        flowsint_error::FlowError::config(err.to_string())
    }
}

/// Initialize the global `tracing` subscriber for the process.
///
/// Intended to be called once, near the top of `main`. Returns an error if a
/// subscriber was already installed (e.g. by a test harness).
pub fn init(config: Config) -> Result<(), LogError> {
    let filter = EnvFilter::try_new(&config.filter).map_err(|source| LogError::Filter {
        filter: config.filter.clone(),
        source,
    })?;

    let registry = Registry::default().with(filter);
    let result = match config.format {
        Format::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_ansi(true))
            .try_init(),
        Format::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_ansi(false))
            .try_init(),
    };

    result.map_err(|_| LogError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_info_pretty() {
        let config = Config::default();
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, Format::Pretty);
    }

    #[test]
    fn invalid_filter_reports_filter_error() {
        let config = Config {
            filter: "[[[not a filter".to_string(),
            format: Format::Pretty,
        };
        let err = init(config).unwrap_err();
        assert!(matches!(err, LogError::Filter { .. }));
    }
}
