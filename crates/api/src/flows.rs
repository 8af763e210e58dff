use chrono::{DateTime, Utc};
use dashmap::DashMap;
use flowsint_core::FlowId;
use flowsint_error::FlowError;
use flowsint_flow::{FlowEdge, FlowNode};
use serde::{Deserialize, Serialize};

/// A user-authored flow graph plus the metadata shown in a flow listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSchema {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

/// A persisted flow: its schema plus the listing metadata a user assigns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: FlowId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub flow_schema: FlowSchema,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields a flow listing needs, without the full node/edge graph.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSummary {
    pub id: FlowId,
    pub name: String,
    pub description: String,
    pub category: String,
}

impl From<&FlowRecord> for FlowSummary {
    fn from(record: &FlowRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
        }
    }
}

/// Fields a create or update request supplies; `id`/timestamps are owned by
/// the store.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowInput {
    pub name: String,
    pub description: String,
    pub category: String,
    pub flow_schema: FlowSchema,
}

/// Process-wide table of every persisted flow, keyed by [`FlowId`].
#[derive(Default)]
pub struct FlowStore {
    flows: DashMap<FlowId, FlowRecord>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new flow record from `input`, assigning it a fresh id.
    pub fn create(&self, input: FlowInput) -> FlowRecord {
        let now = Utc::now();
        let record = FlowRecord {
            id: FlowId::v4(),
            name: input.name,
            description: input.description,
            category: input.category,
            flow_schema: input.flow_schema,
            created_at: now,
            updated_at: now,
        };
        self.flows.insert(record.id, record.clone());
        record
    }

    /// Every flow's listing summary, in no particular order.
    pub fn list(&self) -> Vec<FlowSummary> {
        self.flows.iter().map(|entry| FlowSummary::from(entry.value())).collect()
    }

    /// Look up one flow's full record. Unknown ids are always `NotFound`.
    pub fn get(&self, id: FlowId) -> Result<FlowRecord, FlowError> {
        self.flows
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FlowError::not_found("flow", id.to_string()))
    }

    /// Replace `id`'s fields with `input`, bumping `updated_at`. `NotFound`
    /// if `id` isn't a known flow.
    pub fn update(&self, id: FlowId, input: FlowInput) -> Result<FlowRecord, FlowError> {
        let mut entry = self
            .flows
            .get_mut(&id)
            .ok_or_else(|| FlowError::not_found("flow", id.to_string()))?;
        entry.name = input.name;
        entry.description = input.description;
        entry.category = input.category;
        entry.flow_schema = input.flow_schema;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    /// Remove `id`. `NotFound` if it isn't a known flow.
    pub fn delete(&self, id: FlowId) -> Result<(), FlowError> {
        self.flows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| FlowError::not_found("flow", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> FlowInput {
        FlowInput {
            name: name.to_string(),
            description: "a test flow".to_string(),
            category: "dns".to_string(),
            flow_schema: FlowSchema {
                nodes: Vec::new(),
                edges: Vec::new(),
            },
        }
    }

    #[test]
    fn created_flows_show_up_in_the_listing() {
        let store = FlowStore::new();
        let record = store.create(input("whois chain"));
        let summaries = store.list();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, record.id);
    }

    #[test]
    fn unknown_id_is_not_found_on_get_update_and_delete() {
        let store = FlowStore::new();
        let id = FlowId::v4();
        assert_eq!(store.get(id).unwrap_err().kind(), flowsint_error::ErrorKind::NotFound);
        assert_eq!(
            store.update(id, input("x")).unwrap_err().kind(),
            flowsint_error::ErrorKind::NotFound
        );
        assert_eq!(store.delete(id).unwrap_err().kind(), flowsint_error::ErrorKind::NotFound);
    }

    #[test]
    fn update_replaces_fields_and_bumps_updated_at() {
        let store = FlowStore::new();
        let record = store.create(input("before"));
        let updated = store.update(record.id, input("after")).unwrap();
        assert_eq!(updated.name, "after");
        assert!(updated.updated_at >= record.updated_at);
    }

    #[test]
    fn deleted_flow_is_gone_from_the_listing() {
        let store = FlowStore::new();
        let record = store.create(input("to delete"));
        store.delete(record.id).unwrap();
        assert!(store.list().is_empty());
    }
}
