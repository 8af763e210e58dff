use chrono::{DateTime, Utc};
use flowsint_core::{NodeId, Record, Scope};
use serde::{Deserialize, Serialize};

/// A persisted graph node: a validated entity plus the scope and storage
/// metadata it was written under.
///
/// `id` is caller-supplied on the first write of a `(type_name,
/// primary_key_value)` pair and preserved by the backend across merges; a
/// later upsert of the same pair keeps the original id and `created_at`,
/// updating only `record`/`label`/`scope`.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Stable identity, assigned at first write.
    pub id: NodeId,
    /// Name of the entity type this node's record was validated against.
    pub type_name: String,
    /// Value of the entity's declared primary-key field; merge key together
    /// with `type_name`.
    pub primary_key_value: String,
    /// The entity's field record.
    pub record: Record,
    /// Tenancy boundary the node was written under.
    pub scope: Scope,
    /// When this node was first written. Preserved across later merges.
    pub created_at: DateTime<Utc>,
    /// Display label, computed from the entity's label field.
    pub label: String,
}

/// A directed relationship between two graph nodes, created by an
/// enricher's output or by a flow edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Node the edge originates from.
    pub from: NodeId,
    /// Node the edge points to.
    pub to: NodeId,
    /// Relationship label (e.g. `"resolves_to"`, `"owned_by"`).
    pub label: String,
    /// Scalar attributes of the relationship itself, overwritten whole on
    /// each upsert (used by transaction-like relations).
    pub properties: Record,
}
