use flowsint_core::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Value as Json, json};

use crate::error::ValidationError;
use crate::field::{FieldError, FieldKind, FieldSpec};

/// The declared shape of one kind of entity: its fields, which field
/// identifies it uniquely, and which field is shown to a user as its label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityType {
    name: String,
    fields: Vec<FieldSpec>,
    primary_key: String,
    label_field: Option<String>,
}

impl EntityType {
    /// Start building an entity type named `name`.
    pub fn builder(name: impl Into<String>) -> EntityTypeBuilder {
        EntityTypeBuilder::new(name)
    }

    /// The entity type's declared name, exactly as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Name of the field that uniquely identifies an instance of this type.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Name of the field used to label an instance of this type to a user,
    /// if one was declared.
    pub fn label_field(&self) -> Option<&str> {
        self.label_field.as_deref()
    }

    /// Check `record` against every declared field, collecting all failures
    /// rather than stopping at the first.
    pub fn validate(&self, record: &Record) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        for field in &self.fields {
            match record.get(&field.name) {
                None => {
                    if field.required {
                        errors.push(FieldError {
                            field: field.name.clone(),
                            reason: "missing required field".to_string(),
                        });
                    }
                }
                Some(value) => {
                    if value.is_null() {
                        if field.required {
                            errors.push(FieldError {
                                field: field.name.clone(),
                                reason: "required field is null".to_string(),
                            });
                        }
                        continue;
                    }
                    if let Err(reason) = check_kind(value, &field.kind) {
                        errors.push(FieldError {
                            field: field.name.clone(),
                            reason,
                        });
                    }
                }
            }
        }

        if record.get(&self.primary_key).is_none() {
            errors.push(FieldError {
                field: self.primary_key.clone(),
                reason: "missing primary key".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.name.clone(), errors))
        }
    }

    /// Render this entity type as a JSON Schema object, for the `/types/`
    /// and `/flows/raw_materials` HTTP endpoints.
    pub fn json_schema(&self) -> Json {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            properties.insert(field.name.clone(), field_kind_schema(&field.kind));
            if field.required {
                required.push(Json::String(field.name.clone()));
            }
        }

        json!({
            "title": self.name,
            "type": "object",
            "properties": Json::Object(properties),
            "required": required,
        })
    }
}

fn field_kind_schema(kind: &FieldKind) -> Json {
    match kind {
        FieldKind::String => json!({"type": "string"}),
        FieldKind::Number => json!({"type": "number"}),
        FieldKind::Bool => json!({"type": "boolean"}),
        FieldKind::Entity { type_name } => json!({"$ref": format!("#/definitions/{type_name}")}),
        FieldKind::List { element } => json!({
            "type": "array",
            "items": field_kind_schema(element),
        }),
    }
}

fn check_kind(value: &Json, kind: &FieldKind) -> Result<(), String> {
    match kind {
        FieldKind::String => {
            if value.is_string() {
                Ok(())
            } else {
                Err("expected a string".to_string())
            }
        }
        FieldKind::Number => {
            if value.is_number() {
                Ok(())
            } else {
                Err("expected a number".to_string())
            }
        }
        FieldKind::Bool => {
            if value.is_boolean() {
                Ok(())
            } else {
                Err("expected a boolean".to_string())
            }
        }
        FieldKind::Entity { type_name } => {
            if value.is_object() {
                Ok(())
            } else {
                Err(format!("expected an object matching '{type_name}'"))
            }
        }
        FieldKind::List { element } => match value.as_array() {
            None => Err("expected an array".to_string()),
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    if let Err(reason) = check_kind(item, element) {
                        return Err(format!("item {i}: {reason}"));
                    }
                }
                Ok(())
            }
        },
    }
}

/// Builder for [`EntityType`], mirroring the chainable `with_*` style used
/// across the engine's other registries.
pub struct EntityTypeBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    primary_key: Option<String>,
    label_field: Option<String>,
}

impl EntityTypeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary_key: None,
            label_field: None,
        }
    }

    /// Add a declared field.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare which field is the primary key. Required before [`Self::build`].
    pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    /// Declare which field is shown to a user as this entity's label.
    pub fn with_label_field(mut self, field: impl Into<String>) -> Self {
        self.label_field = Some(field.into());
        self
    }

    /// Finish building. Panics if no primary key was declared — entity
    /// types are always authored in code or loaded from a fixed config, so
    /// this is a construction-time programmer error, not a runtime one.
    pub fn build(self) -> EntityType {
        EntityType {
            name: self.name,
            fields: self.fields,
            primary_key: self.primary_key.expect("entity type must declare a primary key"),
            label_field: self.label_field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_type() -> EntityType {
        EntityType::builder("Person")
            .with_field(FieldSpec::required("email", FieldKind::String))
            .with_field(FieldSpec::optional("age", FieldKind::Number))
            .with_primary_key("email")
            .with_label_field("email")
            .build()
    }

    fn record(pairs: &[(&str, Json)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn valid_record_passes() {
        let ty = person_type();
        let rec = record(&[("email", json!("a@example.com")), ("age", json!(30))]);
        assert!(ty.validate(&rec).is_ok());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let ty = person_type();
        let rec = record(&[("age", json!(30))]);
        let err = ty.validate(&rec).unwrap_err();
        assert!(err.fields.iter().any(|f| f.field == "email"));
    }

    #[test]
    fn all_offending_fields_are_collected_not_just_the_first() {
        let ty = EntityType::builder("Thing")
            .with_field(FieldSpec::required("a", FieldKind::String))
            .with_field(FieldSpec::required("b", FieldKind::Number))
            .with_primary_key("id")
            .build();
        let rec = record(&[("a", json!(1)), ("b", json!("not a number"))]);
        let err = ty.validate(&rec).unwrap_err();
        assert_eq!(err.fields.len(), 3);
    }

    #[test]
    fn wrong_type_is_reported_with_field_name() {
        let ty = person_type();
        let rec = record(&[("email", json!(42))]);
        let err = ty.validate(&rec).unwrap_err();
        assert_eq!(err.fields[0].field, "email");
    }

    #[test]
    fn json_schema_marks_required_fields() {
        let ty = person_type();
        let schema = ty.json_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required, &[json!("email")]);
    }
}
