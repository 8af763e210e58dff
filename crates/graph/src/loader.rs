use std::sync::Arc;

use flowsint_core::{NodeId, Record, Value, is_empty_value};
use flowsint_error::FlowError;

use crate::backend::GraphBackend;

/// Reads graph nodes back out for the orchestrator to feed into enrichers,
/// stripping everything that isn't part of the entity's own record.
pub struct NodeLoader {
    backend: Arc<dyn GraphBackend>,
}

impl NodeLoader {
    /// Build a loader over `backend`.
    pub fn new(backend: Arc<dyn GraphBackend>) -> Self {
        Self { backend }
    }

    /// Load `ids`, stripping storage metadata and dropping empty values
    /// (null, empty string, empty array/object) from each record.
    ///
    /// An empty result — no id resolved to a node — is a `NotFound` error;
    /// the Node Loader never hands the orchestrator an empty success.
    pub async fn load(&self, ids: &[NodeId]) -> Result<Vec<Record>, FlowError> {
        let nodes = self.backend.get_nodes_by_ids(ids).await?;
        if nodes.is_empty() {
            return Err(FlowError::not_found(
                "node",
                ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", "),
            ));
        }

        Ok(nodes
            .into_iter()
            .map(|node| strip_empty_fields(node.record))
            .collect())
    }
}

fn strip_empty_fields(record: Record) -> Record {
    record
        .into_iter()
        .filter(|(_, value)| !is_empty_value(value))
        .collect()
}
