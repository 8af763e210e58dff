use async_trait::async_trait;
use flowsint_core::{Scope, Value};
use flowsint_error::FlowError;
use flowsint_graph::GraphBackend;

use crate::metadata::EnricherMetadata;

/// An enricher's identity: its metadata, used by the registry and the
/// flow compiler without running anything.
pub trait Enricher: Send + Sync {
    /// Static description of this enricher.
    fn metadata(&self) -> &EnricherMetadata;
}

/// The four-phase execution contract every enricher implements
/// `preprocess` shapes the input, `scan` does the actual
/// network/IO work, `postprocess` shapes the output, and `execute` runs
/// all three in order.
///
/// Only `scan` is required; `preprocess`/`postprocess` default to the
/// identity transform. A failure in `preprocess` is a validation error
/// (the input was malformed before any IO happened); a failure in `scan`
/// is an enricher error (the IO itself failed) and is never retried
/// within the run. `postprocess` receives the run's sketch-scoped graph
/// writer and is where an enricher commits the entities/relationships its
/// output implies — registered enrichers are process-wide singletons with
/// no sketch of their own, so the scope has to be threaded in per call
/// rather than held on `self`.
#[async_trait]
pub trait EnricherImpl: Enricher {
    /// Validate and reshape `input` before scanning. Defaults to identity.
    async fn preprocess(&self, input: Value) -> Result<Value, FlowError> {
        Ok(input)
    }

    /// Perform the enricher's actual work against `input`.
    async fn scan(&self, input: Value) -> Result<Value, FlowError>;

    /// Reshape the scan's raw output into the enricher's declared shape and
    /// emit any graph writes it implies. Defaults to identity with no graph
    /// writes.
    async fn postprocess(&self, output: Value, graph: &dyn GraphBackend, scope: Scope) -> Result<Value, FlowError> {
        let _ = (graph, scope);
        Ok(output)
    }

    /// Run `preprocess`, `scan`, and `postprocess` in order.
    async fn execute(&self, input: Value, graph: &dyn GraphBackend, scope: Scope) -> Result<Value, FlowError> {
        let preprocessed = self.preprocess(input).await?;
        let scanned = self.scan(preprocessed).await?;
        self.postprocess(scanned, graph, scope).await
    }

    /// Run [`Self::execute`] over a batch of inputs independently: one
    /// item's failure does not stop the rest from being attempted.
    async fn execute_batch(
        &self,
        inputs: Vec<Value>,
        graph: &dyn GraphBackend,
        scope: Scope,
    ) -> Vec<Result<Value, FlowError>> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            results.push(self.execute(input, graph, scope).await);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EnricherMetadata;
    use chrono::Utc;
    use flowsint_core::{Record, SketchId, UserId};
    use flowsint_graph::{GraphEdge, GraphNode, InMemoryGraphBackend};
    use serde_json::json;

    struct FlakyEnricher {
        metadata: EnricherMetadata,
    }

    #[async_trait]
    impl Enricher for FlakyEnricher {
        fn metadata(&self) -> &EnricherMetadata {
            &self.metadata
        }
    }

    #[async_trait]
    impl EnricherImpl for FlakyEnricher {
        async fn scan(&self, input: Value) -> Result<Value, FlowError> {
            if input == json!("bad") {
                Err(FlowError::enricher("simulated network failure"))
            } else {
                Ok(json!({"input": input}))
            }
        }
    }

    fn scope() -> Scope {
        Scope::new(SketchId::v4(), UserId::v4())
    }

    #[tokio::test]
    async fn execute_runs_all_three_phases() {
        let enricher = FlakyEnricher {
            metadata: EnricherMetadata::builder("flaky").build(),
        };
        let graph = InMemoryGraphBackend::new();
        let result = enricher.execute(json!("good"), &graph, scope()).await.unwrap();
        assert_eq!(result, json!({"input": "good"}));
    }

    #[tokio::test]
    async fn one_bad_item_in_a_batch_does_not_stop_the_rest() {
        let enricher = FlakyEnricher {
            metadata: EnricherMetadata::builder("flaky").build(),
        };
        let graph = InMemoryGraphBackend::new();
        let results = enricher
            .execute_batch(vec![json!("good"), json!("bad"), json!("also good")], &graph, scope())
            .await;
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    /// An enricher whose `postprocess` commits the entity its scan produced,
    /// plus an edge back to the domain it resolved from. Demonstrates that
    /// the sketch-scoped graph writer threaded through `execute` is actually
    /// usable from a real `postprocess` override, not just present in the
    /// signature.
    struct DomainToIpEnricher {
        metadata: EnricherMetadata,
    }

    #[async_trait]
    impl Enricher for DomainToIpEnricher {
        fn metadata(&self) -> &EnricherMetadata {
            &self.metadata
        }
    }

    #[async_trait]
    impl EnricherImpl for DomainToIpEnricher {
        async fn scan(&self, input: Value) -> Result<Value, FlowError> {
            let domain = input.get("domain").and_then(|v| v.as_str()).unwrap_or_default();
            Ok(json!({"domain": domain, "ip": "93.184.216.34"}))
        }

        async fn postprocess(&self, output: Value, graph: &dyn GraphBackend, scope: Scope) -> Result<Value, FlowError> {
            let domain = output.get("domain").and_then(|v| v.as_str()).unwrap_or_default().to_string();
            let ip = output.get("ip").and_then(|v| v.as_str()).unwrap_or_default().to_string();

            graph
                .upsert_node(GraphNode {
                    id: flowsint_core::NodeId::v4(),
                    type_name: "Domain".to_string(),
                    primary_key_value: domain.clone(),
                    record: [("name".to_string(), json!(domain))].into(),
                    scope,
                    created_at: Utc::now(),
                    label: domain.clone(),
                })
                .await?;
            let ip_id = flowsint_core::NodeId::v4();
            graph
                .upsert_node(GraphNode {
                    id: ip_id,
                    type_name: "Ip".to_string(),
                    primary_key_value: ip.clone(),
                    record: [("address".to_string(), json!(ip))].into(),
                    scope,
                    created_at: Utc::now(),
                    label: ip.clone(),
                })
                .await?;
            graph
                .upsert_edge(GraphEdge {
                    from: ip_id,
                    to: ip_id,
                    label: "resolves_to".to_string(),
                    properties: Record::new(),
                })
                .await?;

            Ok(output)
        }
    }

    #[tokio::test]
    async fn postprocess_can_commit_graph_writes_through_the_threaded_backend() {
        let enricher = DomainToIpEnricher {
            metadata: EnricherMetadata::builder("domain_to_ip").build(),
        };
        let graph = InMemoryGraphBackend::new();
        enricher
            .execute(json!({"domain": "example.com"}), &graph, scope())
            .await
            .unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }
}
