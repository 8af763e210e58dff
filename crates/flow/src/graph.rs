use flowsint_core::{NodeId, Record};
use serde::{Deserialize, Serialize};

/// A node of a user-authored flow graph: either a seed slot of a fixed
/// entity type, or a reference to a registered enricher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlowNode {
    /// A seed slot. `output_fields` is ordered; the first is the field a
    /// seed value is bound to.
    Type {
        id: NodeId,
        entity_type: String,
        output_fields: Vec<String>,
    },
    /// A reference to a registered enricher plus its configured params.
    Enricher {
        id: NodeId,
        enricher_name: String,
        params: Record,
    },
}

impl FlowNode {
    /// The node's identity, regardless of kind.
    pub fn id(&self) -> NodeId {
        match self {
            FlowNode::Type { id, .. } => *id,
            FlowNode::Enricher { id, .. } => *id,
        }
    }
}

/// A directed connection between two flow nodes. `source_handle` names a
/// field on the source node's output record; `target_handle` names a field
/// on the target node's input record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source_node: NodeId,
    pub source_handle: String,
    pub target_node: NodeId,
    pub target_handle: String,
}

/// Where a step's run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// What kind of work a compiled step performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Binds the run's seed value to a type node's first output field.
    Type,
    /// Invokes a named, registered enricher.
    Enricher { name: String },
    /// A flow that could not be compiled; carries a description of why.
    Error { message: String },
}

/// One node visit along a compiled branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub node_id: NodeId,
    pub kind: StepKind,
    pub params: Record,
    pub inputs: Record,
    pub outputs: Record,
    pub status: StepStatus,
    pub depth: usize,
    pub branch_id: String,
}

/// A linear execution path compiled from the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub steps: Vec<Step>,
}

impl Branch {
    /// Number of steps, used for the post-compile ascending-length sort.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Construct a single synthetic error branch — the Branch Compiler's uniform
/// way of surfacing a malformed flow without crashing.
pub(crate) fn error_branch(message: impl Into<String>) -> Branch {
    let branch_id = "branch-error".to_string();
    Branch {
        id: branch_id.clone(),
        name: "Main Flow".to_string(),
        steps: vec![Step {
            node_id: NodeId::nil(),
            kind: StepKind::Error {
                message: message.into(),
            },
            params: Record::new(),
            inputs: Record::new(),
            outputs: Record::new(),
            status: StepStatus::Error,
            depth: 0,
            branch_id,
        }],
    }
}
