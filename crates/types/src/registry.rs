use std::collections::HashMap;
use std::sync::Arc;

use flowsint_error::FlowError;

use crate::entity_type::EntityType;

/// Holds every known [`EntityType`], keyed both by its exact declared name
/// and by the lowercase form of that name, so lookups are forgiving of case
/// without ever guessing at an unknown name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_name: HashMap<String, Arc<EntityType>>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entity_type`, replacing any prior registration under the
    /// same name. Idempotent: registering the same type twice leaves the
    /// registry in the same state as registering it once.
    pub fn register(&mut self, entity_type: EntityType) {
        let entity_type = Arc::new(entity_type);
        self.by_name
            .insert(entity_type.name().to_string(), entity_type.clone());
        self.by_name
            .insert(entity_type.name().to_lowercase(), entity_type);
    }

    /// Look up a type by its exact name or lowercase form. An unknown name
    /// is always a `NotFound` error, never a best-effort guess.
    pub fn get(&self, name: &str) -> Result<Arc<EntityType>, FlowError> {
        self.by_name
            .get(name)
            .or_else(|| self.by_name.get(&name.to_lowercase()))
            .cloned()
            .ok_or_else(|| FlowError::not_found("entity type", name))
    }

    /// Whether a type is registered under `name` (exact or lowercase).
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name) || self.by_name.contains_key(&name.to_lowercase())
    }

    /// All distinct registered types, in no particular order.
    pub fn list(&self) -> Vec<Arc<EntityType>> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for ty in self.by_name.values() {
            if seen.insert(ty.name().to_string()) {
                out.push(ty.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldSpec};

    fn domain_type() -> EntityType {
        EntityType::builder("Domain")
            .with_field(FieldSpec::required("name", FieldKind::String))
            .with_primary_key("name")
            .build()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = TypeRegistry::new();
        registry.register(domain_type());
        assert!(registry.get("Domain").is_ok());
        assert!(registry.get("domain").is_ok());
    }

    #[test]
    fn unknown_name_is_not_found_never_a_guess() {
        let registry = TypeRegistry::new();
        let err = registry.get("Nonexistent").unwrap_err();
        assert_eq!(err.kind(), flowsint_error::ErrorKind::NotFound);
    }

    #[test]
    fn re_registering_is_idempotent() {
        let mut registry = TypeRegistry::new();
        registry.register(domain_type());
        registry.register(domain_type());
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn list_has_no_duplicate_from_the_lowercase_key() {
        let mut registry = TypeRegistry::new();
        registry.register(domain_type());
        assert_eq!(registry.list().len(), 1);
    }
}
