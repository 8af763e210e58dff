use chrono::{DateTime, Utc};
use flowsint_core::{Record, ScanId, SketchId};
use serde::{Deserialize, Serialize};

/// Where a scan currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Pending,
    Completed,
    Failed,
}

/// A single submitted job: an enricher or flow run against one sketch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub id: ScanId,
    pub sketch_id: SketchId,
    pub status: ScanStatus,
    pub results: Option<Record>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Scan {
    /// A freshly created row, before the worker has picked it up.
    pub fn pending(sketch_id: SketchId) -> Self {
        Self {
            id: ScanId::v4(),
            sketch_id,
            status: ScanStatus::Pending,
            results: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record a successful run.
    pub fn complete(&mut self, results: Record) {
        self.status = ScanStatus::Completed;
        self.results = Some(results);
        self.completed_at = Some(Utc::now());
    }

    /// Record a failed run. The exception that caused it is not re-raised
    /// from here — retry policy, if any, lives at the caller that spawned
    /// the submission.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = ScanStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_scan_is_pending_with_no_results() {
        let scan = Scan::pending(SketchId::v4());
        assert_eq!(scan.status, ScanStatus::Pending);
        assert!(scan.results.is_none());
        assert!(scan.completed_at.is_none());
    }

    #[test]
    fn completing_sets_results_and_completed_at() {
        let mut scan = Scan::pending(SketchId::v4());
        scan.complete(Record::new());
        assert_eq!(scan.status, ScanStatus::Completed);
        assert!(scan.completed_at.is_some());
    }

    #[test]
    fn failing_records_the_error_message() {
        let mut scan = Scan::pending(SketchId::v4());
        scan.fail("missing required secret 'pdcp_api_key'");
        assert_eq!(scan.status, ScanStatus::Failed);
        assert_eq!(scan.error.as_deref(), Some("missing required secret 'pdcp_api_key'"));
    }
}
