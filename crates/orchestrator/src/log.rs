use chrono::{DateTime, Utc};
use flowsint_core::{NodeId, Record};
use serde::{Deserialize, Serialize};

/// Lifecycle of a single orchestrator run's execution log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Initialized,
    Running,
    Completed,
    Failed,
}

/// One entry per step attempted, appended as the run progresses so a
/// crash mid-run still leaves a readable partial log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepLogEntry {
    pub branch_id: String,
    pub node_id: NodeId,
    pub enricher_name: Option<String>,
    pub inputs: Record,
    pub outputs: Option<Record>,
    pub status: String,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub execution_time_ms: u64,
    pub cache_hit: bool,
}

/// Running counters over the entries recorded so far.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub total_time_ms: u64,
}

/// A run's execution log: created at orchestrator construction, flushed
/// incrementally one step at a time so a crash leaves a partial but
/// readable record rather than nothing at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLog {
    status: LogStatus,
    entries: Vec<StepLogEntry>,
    summary: Summary,
    final_results: Option<Record>,
}

impl ExecutionLog {
    /// A freshly created log, not yet started.
    pub fn new() -> Self {
        Self {
            status: LogStatus::Initialized,
            entries: Vec::new(),
            summary: Summary::default(),
            final_results: None,
        }
    }

    pub fn status(&self) -> LogStatus {
        self.status
    }

    pub fn entries(&self) -> &[StepLogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn final_results(&self) -> Option<&Record> {
        self.final_results.as_ref()
    }

    /// Append a step's outcome, updating the running summary. Transitions
    /// the log to `running` on the first call.
    pub fn record_step(&mut self, entry: StepLogEntry) {
        if self.status == LogStatus::Initialized {
            self.status = LogStatus::Running;
        }
        self.summary.total += 1;
        self.summary.total_time_ms += entry.execution_time_ms;
        match entry.status.as_str() {
            "completed" => self.summary.completed += 1,
            "error" => self.summary.failed += 1,
            _ => {}
        }
        self.entries.push(entry);
    }

    /// Mark the run as completed and attach its final results.
    pub fn finish_completed(&mut self, final_results: Record) {
        self.status = LogStatus::Completed;
        self.final_results = Some(final_results);
    }

    /// Mark the run as failed. No `final_results` is attached; the last
    /// entry's `error` field already carries the failure reason.
    pub fn finish_failed(&mut self) {
        self.status = LogStatus::Failed;
    }
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(status: &str) -> StepLogEntry {
        StepLogEntry {
            branch_id: "branch-0".to_string(),
            node_id: NodeId::v4(),
            enricher_name: Some("domain_to_asn".to_string()),
            inputs: Record::new(),
            outputs: None,
            status: status.to_string(),
            error: None,
            timestamp: Utc::now(),
            execution_time_ms: 5,
            cache_hit: false,
        }
    }

    #[test]
    fn recording_the_first_step_moves_the_log_to_running() {
        let mut log = ExecutionLog::new();
        assert_eq!(log.status(), LogStatus::Initialized);
        log.record_step(entry("completed"));
        assert_eq!(log.status(), LogStatus::Running);
    }

    #[test]
    fn summary_counts_completed_and_failed_separately() {
        let mut log = ExecutionLog::new();
        log.record_step(entry("completed"));
        log.record_step(entry("error"));
        log.record_step(entry("completed"));
        let summary = log.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn finishing_failed_leaves_final_results_unset() {
        let mut log = ExecutionLog::new();
        log.record_step(entry("error"));
        log.finish_failed();
        assert_eq!(log.status(), LogStatus::Failed);
        assert!(log.final_results().is_none());
    }

    #[test]
    fn finishing_completed_attaches_final_results() {
        let mut log = ExecutionLog::new();
        log.record_step(entry("completed"));
        log.finish_completed(Record::new());
        assert_eq!(log.status(), LogStatus::Completed);
        assert!(log.final_results().is_some());
    }
}
