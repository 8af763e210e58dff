use flowsint_core::Record;

use crate::entity_type::EntityType;
use crate::error::ValidationError;

/// A record that has been checked against its [`EntityType`] and is known to
/// satisfy every declared field constraint.
///
/// Constructed only through [`Entity::validate`]; an entity that fails
/// validation never gets one of these and so never enters the system.
#[derive(Debug, Clone)]
pub struct Entity {
    type_name: String,
    record: Record,
}

impl Entity {
    /// Validate `record` against `entity_type` and, if it passes, wrap it as
    /// an [`Entity`]. Fields not declared by `entity_type` are kept as-is.
    pub fn validate(entity_type: &EntityType, record: Record) -> Result<Self, ValidationError> {
        entity_type.validate(&record)?;
        Ok(Self {
            type_name: entity_type.name().to_string(),
            record,
        })
    }

    /// Name of the entity type this record was validated against.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The underlying field record.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Consume the entity, returning its underlying record.
    pub fn into_record(self) -> Record {
        self.record
    }
}
