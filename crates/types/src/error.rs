use flowsint_error::FlowError;
use serde::{Deserialize, Serialize};

use crate::field::FieldError;

/// A record failed to validate against its declared entity type.
///
/// Collects *every* offending field rather than stopping at the first, so a
/// caller can report the whole set of problems in one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Name of the entity type the record was checked against.
    pub type_name: String,
    /// Every field that failed, in declaration order.
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(type_name: impl Into<String>, fields: Vec<FieldError>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed validation: ", self.type_name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field.field, field.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for FlowError {
    fn from(err: ValidationError) -> Self {
        FlowError::validation(err.to_string())
    }
}
