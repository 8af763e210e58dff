use std::sync::Arc;

use flowsint_enrichers::EnricherRegistry;
use flowsint_flow::EnricherSchema;

/// Adapts the process-wide [`EnricherRegistry`] to the branch compiler's
/// [`EnricherSchema`] seam, so `/flows/*/compute` can compile a flow
/// against real enricher metadata instead of a test double.
pub struct RegistryEnricherSchema {
    registry: Arc<EnricherRegistry>,
}

impl RegistryEnricherSchema {
    pub fn new(registry: Arc<EnricherRegistry>) -> Self {
        Self { registry }
    }
}

impl EnricherSchema for RegistryEnricherSchema {
    fn output_fields(&self, enricher_name: &str) -> Option<Vec<String>> {
        let enricher = self.registry.get(enricher_name).ok()?;
        Some(enricher.metadata().output_fields().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use flowsint_core::Value;
    use flowsint_enrichers::{Enricher, EnricherImpl, EnricherMetadata};
    use flowsint_error::FlowError;

    struct NoopEnricher {
        metadata: EnricherMetadata,
    }

    #[async_trait]
    impl Enricher for NoopEnricher {
        fn metadata(&self) -> &EnricherMetadata {
            &self.metadata
        }
    }

    #[async_trait]
    impl EnricherImpl for NoopEnricher {
        async fn scan(&self, input: Value) -> Result<Value, FlowError> {
            Ok(input)
        }
    }

    #[test]
    fn known_enricher_reports_its_declared_output_fields() {
        let mut registry = EnricherRegistry::new();
        registry.register(Arc::new(NoopEnricher {
            metadata: EnricherMetadata::builder("domain_to_asn")
                .with_output_field("asn")
                .build(),
        }));
        let schema = RegistryEnricherSchema::new(Arc::new(registry));
        assert_eq!(schema.output_fields("domain_to_asn"), Some(vec!["asn".to_string()]));
    }

    #[test]
    fn unknown_enricher_reports_no_output_fields() {
        let schema = RegistryEnricherSchema::new(Arc::new(EnricherRegistry::new()));
        assert_eq!(schema.output_fields("nonexistent"), None);
    }
}
