use std::path::PathBuf;
use std::time::Duration;

/// Tunables for the Task Runtime's worker pool, read from the environment
/// so the worker process and the API process can share a single source of
/// truth.
#[derive(Debug, Clone)]
pub struct TaskRuntimeConfig {
    /// Maximum number of submissions executed concurrently.
    pub worker_count: usize,
    /// Default per-request timeout an enricher's `scan` should apply to its
    /// own network I/O, unless a node's params override it. The runtime
    /// does not itself wrap a run in this timeout; enrichers read it when
    /// constructing their HTTP clients.
    pub default_enricher_timeout: Duration,
    /// Directory a flow run's execution log is written to, as
    /// `enricher_execution_<sketch>_<scan>.json`.
    pub log_dir: PathBuf,
}

impl Default for TaskRuntimeConfig {
    fn default() -> Self {
        Self {
            worker_count: 4,
            default_enricher_timeout: Duration::from_secs(10),
            log_dir: PathBuf::from("enricher_logs"),
        }
    }
}

impl TaskRuntimeConfig {
    /// Read `FLOWSINT_WORKER_COUNT`, `FLOWSINT_ENRICHER_TIMEOUT_SECS`, and
    /// `FLOWSINT_LOG_DIR`, falling back to the defaults when unset or
    /// unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let worker_count = std::env::var("FLOWSINT_WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.worker_count);
        let timeout_secs = std::env::var("FLOWSINT_ENRICHER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.default_enricher_timeout.as_secs());
        let log_dir = std::env::var("FLOWSINT_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);
        Self {
            worker_count,
            default_enricher_timeout: Duration::from_secs(timeout_secs),
            log_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_four_workers_and_a_ten_second_timeout() {
        let config = TaskRuntimeConfig::default();
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.default_enricher_timeout, Duration::from_secs(10));
    }
}
