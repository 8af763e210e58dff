use flowsint_core::{NodeId, Record};
use flowsint_flow::StepStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of a single compiled step once the run has reached it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub node_id: NodeId,
    pub enricher_name: Option<String>,
    pub status: StepStatus,
    pub outputs: Option<Record>,
    pub error: Option<String>,
}

/// A branch's steps as actually executed, in compiled order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchResult {
    pub id: String,
    pub name: String,
    pub steps: Vec<StepResult>,
}

/// Everything a completed (or aborted) orchestrator run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub initial_values: Record,
    pub branches: Vec<BranchResult>,
    pub results: HashMap<NodeId, Record>,
    pub reference_mapping: Record,
}

impl ExecutionResult {
    /// `true` once any step in the run ended in `error` — the point at
    /// which the run stopped attempting further branches.
    pub fn has_failed_step(&self) -> bool {
        self.branches
            .iter()
            .flat_map(|b| &b.steps)
            .any(|s| s.status == StepStatus::Error)
    }
}
