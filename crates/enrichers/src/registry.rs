use std::collections::HashMap;
use std::sync::Arc;

use flowsint_error::FlowError;

use crate::enricher::EnricherImpl;

/// Process-wide table of every enricher known to the engine, keyed by its
/// unique name.
///
/// Mirrors the action registry's register/get/list/unregister shape: a
/// plain name-keyed map behind `Arc` so handed-out enrichers can be shared
/// across concurrently running steps.
#[derive(Default, Clone)]
pub struct EnricherRegistry {
    enrichers: HashMap<String, Arc<dyn EnricherImpl>>,
}

impl EnricherRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `enricher` under its metadata name, replacing any prior
    /// registration under the same name.
    pub fn register(&mut self, enricher: Arc<dyn EnricherImpl>) {
        let name = enricher.metadata().name().to_string();
        self.enrichers.insert(name, enricher);
    }

    /// Look up an enricher by name. Unknown names are never a best-effort
    /// guess; they are always `NotFound`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn EnricherImpl>, FlowError> {
        self.enrichers
            .get(name)
            .cloned()
            .ok_or_else(|| FlowError::not_found("Enricher", name))
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.enrichers.contains_key(name)
    }

    /// Remove `name`, returning the enricher that was registered there.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn EnricherImpl>> {
        self.enrichers.remove(name)
    }

    /// Every registered enricher, in no particular order.
    pub fn list(&self) -> Vec<Arc<dyn EnricherImpl>> {
        self.enrichers.values().cloned().collect()
    }

    /// Every registered enricher whose metadata accepts `type_name` as
    /// input — used to populate the enricher picker for a given entity
    /// type.
    pub fn list_for_input_type(&self, type_name: &str) -> Vec<Arc<dyn EnricherImpl>> {
        self.enrichers
            .values()
            .filter(|e| e.metadata().accepts_input_type(type_name))
            .cloned()
            .collect()
    }
}
