use crate::param::ParamSpec;

/// Static description of an enricher: what it's called, what category it
/// shows up under, which entity types it accepts, and what parameters it
/// takes.
#[derive(Debug, Clone)]
pub struct EnricherMetadata {
    name: String,
    category: String,
    input_types: Vec<String>,
    excluded_input_types: Vec<String>,
    params: Vec<ParamSpec>,
    primary_input_key: Option<String>,
    output_fields: Vec<String>,
}

impl EnricherMetadata {
    /// Start building metadata for an enricher named `name`.
    pub fn builder(name: impl Into<String>) -> EnricherMetadataBuilder {
        EnricherMetadataBuilder::new(name)
    }

    /// The enricher's unique name, as referenced from a flow node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category used to group enrichers in a listing (e.g. `"dns"`,
    /// `"whois"`).
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Declared parameters.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Entity types this enricher accepts, as declared (may include `"Any"`).
    pub fn input_types(&self) -> &[String] {
        &self.input_types
    }

    /// Entity types explicitly excluded even when otherwise matched by `"Any"`.
    pub fn excluded_input_types(&self) -> &[String] {
        &self.excluded_input_types
    }

    /// Name of the input field this enricher primarily consumes, used to
    /// bind a run's seed value when a step has no wired inputs of its own.
    pub fn primary_input_key(&self) -> Option<&str> {
        self.primary_input_key.as_deref()
    }

    /// Names of the fields this enricher's output record declares, used by
    /// the branch compiler to simulate outputs and wire edges before any
    /// enricher actually runs.
    pub fn output_fields(&self) -> &[String] {
        &self.output_fields
    }

    /// Whether this enricher accepts entities of `type_name` as input.
    ///
    /// An exclusion always wins over an inclusion, and `"Any"` in the
    /// accepted list matches every type not explicitly excluded.
    pub fn accepts_input_type(&self, type_name: &str) -> bool {
        if self.excluded_input_types.iter().any(|t| t == type_name) {
            return false;
        }
        self.input_types.iter().any(|t| t == "Any" || t == type_name)
    }
}

/// Builder for [`EnricherMetadata`].
pub struct EnricherMetadataBuilder {
    name: String,
    category: String,
    input_types: Vec<String>,
    excluded_input_types: Vec<String>,
    params: Vec<ParamSpec>,
    primary_input_key: Option<String>,
    output_fields: Vec<String>,
}

impl EnricherMetadataBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: "general".to_string(),
            input_types: Vec::new(),
            excluded_input_types: Vec::new(),
            params: Vec::new(),
            primary_input_key: None,
            output_fields: Vec::new(),
        }
    }

    /// Set the display category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Accept entities of the given type (or `"Any"` for all types).
    pub fn with_input_type(mut self, type_name: impl Into<String>) -> Self {
        self.input_types.push(type_name.into());
        self
    }

    /// Reject entities of the given type, even if otherwise matched by
    /// `"Any"`.
    pub fn with_excluded_input_type(mut self, type_name: impl Into<String>) -> Self {
        self.excluded_input_types.push(type_name.into());
        self
    }

    /// Declare a parameter.
    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Name the input field this enricher primarily consumes.
    pub fn with_primary_input_key(mut self, field: impl Into<String>) -> Self {
        self.primary_input_key = Some(field.into());
        self
    }

    /// Declare an output field this enricher's result record carries.
    pub fn with_output_field(mut self, field: impl Into<String>) -> Self {
        self.output_fields.push(field.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> EnricherMetadata {
        EnricherMetadata {
            name: self.name,
            category: self.category,
            input_types: self.input_types,
            excluded_input_types: self.excluded_input_types,
            params: self.params,
            primary_input_key: self.primary_input_key,
            output_fields: self.output_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_everything_not_excluded() {
        let meta = EnricherMetadata::builder("whois_lookup")
            .with_input_type("Any")
            .with_excluded_input_type("IpAddress")
            .build();
        assert!(meta.accepts_input_type("Domain"));
        assert!(!meta.accepts_input_type("IpAddress"));
    }

    #[test]
    fn exclusion_wins_even_over_an_explicit_match() {
        let meta = EnricherMetadata::builder("domain_to_asn")
            .with_input_type("Domain")
            .with_excluded_input_type("Domain")
            .build();
        assert!(!meta.accepts_input_type("Domain"));
    }

    #[test]
    fn unlisted_type_is_rejected() {
        let meta = EnricherMetadata::builder("domain_to_asn")
            .with_input_type("Domain")
            .build();
        assert!(!meta.accepts_input_type("Person"));
    }
}
