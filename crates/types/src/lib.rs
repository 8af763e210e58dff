//! # Flowsint Types
//!
//! The entity type system: declares what shape an entity
//! of a given type must have, validates records against that shape, and
//! keeps a process-wide registry of every known type.
//!
//! ## Key components
//!
//! - [`EntityType`] / [`EntityTypeBuilder`] — declared field set, primary
//!   key, and label field for one kind of entity.
//! - [`Entity`] — a record that has already passed validation.
//! - [`TypeRegistry`] — double-keyed (exact name + lowercase) lookup table.
//! - [`ValidationError`] — every offending field from a failed validation,
//!   not just the first.

mod entity;
mod entity_type;
mod error;
mod field;
mod registry;

pub use entity::Entity;
pub use entity_type::{EntityType, EntityTypeBuilder};
pub use error::ValidationError;
pub use field::{FieldError, FieldKind, FieldSpec};
pub use registry::TypeRegistry;

/// Common prelude for crates that work with entity types.
pub mod prelude {
    pub use super::{Entity, EntityType, FieldError, FieldKind, FieldSpec, TypeRegistry, ValidationError};
}
