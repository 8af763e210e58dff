use async_trait::async_trait;
use dashmap::DashMap;
use flowsint_core::NodeId;
use flowsint_error::FlowError;

use crate::node::{GraphEdge, GraphNode};

/// Durable storage for graph nodes and edges.
///
/// Writes are idempotent: upserting the same `(type_name,
/// primary_key_value)` node, or the same `(from, to, label)` edge, twice
/// leaves the graph in the same state as writing it once, with the later
/// record/properties winning (Property 6).
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Insert or replace a node, merging on `(type_name, primary_key_value)`.
    /// A node with no prior match at that key is created with a fresh
    /// identity; a later upsert of the same key keeps the original id and
    /// `created_at`, replacing `record`/`label`/`scope`.
    async fn upsert_node(&self, node: GraphNode) -> Result<(), FlowError>;

    /// Insert or replace an edge. Replacement is keyed on `(from, to,
    /// label)`; `properties` are overwritten whole, never merged field by
    /// field.
    async fn upsert_edge(&self, edge: GraphEdge) -> Result<(), FlowError>;

    /// Fetch every node in `ids` that exists, in no particular order.
    /// Ids with no matching node are silently omitted from the result.
    async fn get_nodes_by_ids(&self, ids: &[NodeId]) -> Result<Vec<GraphNode>, FlowError>;
}

/// An in-memory [`GraphBackend`], for tests and local development.
#[derive(Default)]
pub struct InMemoryGraphBackend {
    nodes: DashMap<NodeId, GraphNode>,
    node_index: DashMap<(String, String), NodeId>,
    edges: DashMap<(NodeId, NodeId, String), GraphEdge>,
}

impl InMemoryGraphBackend {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently stored, for tests that assert on
    /// idempotency.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges currently stored.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[async_trait]
impl GraphBackend for InMemoryGraphBackend {
    async fn upsert_node(&self, node: GraphNode) -> Result<(), FlowError> {
        let merge_key = (node.type_name.clone(), node.primary_key_value.clone());
        if let Some(existing_id) = self.node_index.get(&merge_key).map(|entry| *entry) {
            if let Some(mut existing) = self.nodes.get_mut(&existing_id) {
                existing.record = node.record;
                existing.label = node.label;
                existing.scope = node.scope;
                return Ok(());
            }
        }
        self.node_index.insert(merge_key, node.id);
        self.nodes.insert(node.id, node);
        Ok(())
    }

    async fn upsert_edge(&self, edge: GraphEdge) -> Result<(), FlowError> {
        let key = (edge.from, edge.to, edge.label.clone());
        self.edges.insert(key, edge);
        Ok(())
    }

    async fn get_nodes_by_ids(&self, ids: &[NodeId]) -> Result<Vec<GraphNode>, FlowError> {
        Ok(ids.iter().filter_map(|id| self.nodes.get(id).map(|n| n.clone())).collect())
    }
}
