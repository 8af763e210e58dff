use serde::{Deserialize, Serialize};

/// The primitive or nested-entity shape a field's value must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Any JSON string.
    String,
    /// Any JSON number.
    Number,
    /// Any JSON boolean.
    Bool,
    /// A value that must itself validate against a named entity type.
    Entity {
        /// Name of the referenced entity type.
        type_name: String,
    },
    /// A JSON array of values of the given element kind.
    List {
        /// Element kind for every item in the array.
        element: Box<FieldKind>,
    },
}

/// One declared field of an [`crate::EntityType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, used as the record key.
    pub name: String,
    /// Expected shape of the field's value.
    pub kind: FieldKind,
    /// Whether the field must be present and non-null to validate.
    pub required: bool,
}

impl FieldSpec {
    /// Declare a required field of the given kind.
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
        }
    }

    /// Declare an optional field of the given kind.
    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
        }
    }
}

/// A single field that failed validation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    /// Human-readable reason the field failed.
    pub reason: String,
}
