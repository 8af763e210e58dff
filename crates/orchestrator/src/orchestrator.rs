use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use flowsint_core::{NodeId, Record, Scope, Value};
use flowsint_enrichers::{EnricherRegistry, resolve_params};
use flowsint_error::FlowError;
use flowsint_flow::{Branch, FlowEdge, Step, StepKind, StepStatus};
use flowsint_graph::GraphBackend;
use flowsint_secrets::SecretStore;
use serde_json::json;
use tracing::warn;

use crate::log::{ExecutionLog, StepLogEntry};
use crate::result::{BranchResult, ExecutionResult, StepResult};

/// Runs one scoped execution of a compiled branch list against the
/// enricher runtime.
///
/// Unlike the branch compiler, which binds a single preview seed value and
/// simulates enricher outputs, the orchestrator resolves each step's real
/// inputs at run time: it walks the same edges the compiler used, but pulls
/// from a live map of outputs actually produced so far in this run instead
/// of the compiler's cached placeholders. This keeps the compile-only
/// preview path and the execution path independent, so neither needs to
/// carry the other's data shape.
pub struct Orchestrator {
    enrichers: Arc<EnricherRegistry>,
    secrets: Arc<SecretStore>,
    graph: Arc<dyn GraphBackend>,
}

impl Orchestrator {
    /// Build an orchestrator over the process-wide enricher registry, a
    /// secret store scoped to resolve `vaultSecret` params at run time, and
    /// the graph writer enrichers commit their `postprocess` output to.
    pub fn new(enrichers: Arc<EnricherRegistry>, secrets: Arc<SecretStore>, graph: Arc<dyn GraphBackend>) -> Self {
        Self { enrichers, secrets, graph }
    }

    /// Execute `branches` (as compiled from `edges`) against `seed_values`,
    /// under `scope`.
    ///
    /// Branches run in their compiled order; steps within a branch run in
    /// order. The first step to fail aborts the whole run immediately —
    /// subsequent branches are never attempted, since a later step may
    /// depend on data the failed one would have produced. This holds even
    /// though the failure itself is returned as part of a successful
    /// `Ok` result: only an orchestrator-internal invariant violation
    /// (an `EngineError`) propagates as `Err`.
    pub async fn execute(
        &self,
        branches: &[Branch],
        edges: &[FlowEdge],
        seed_values: &Record,
        scope: Scope,
    ) -> Result<(ExecutionResult, ExecutionLog), FlowError> {
        let incoming = group_by_target(edges);
        let mut live_outputs: HashMap<NodeId, Record> = HashMap::new();
        let mut reference_mapping = Record::new();
        let mut cache: HashMap<(NodeId, String), Record> = HashMap::new();
        let mut log = ExecutionLog::new();
        let mut branch_results = Vec::new();
        let mut aborted = false;

        for branch in branches {
            if aborted {
                break;
            }
            let mut step_results = Vec::new();

            for (index, step) in branch.steps.iter().enumerate() {
                let started = Instant::now();
                let outcome = self
                    .run_step(step, index, &incoming, seed_values, &live_outputs, &mut cache, scope)
                    .await;
                let execution_time_ms = started.elapsed().as_millis() as u64;
                let enricher_name = enricher_name_of(step);

                match outcome {
                    Ok((outputs, cache_hit)) => {
                        live_outputs.insert(step.node_id, outputs.clone());
                        for (field, value) in &outputs {
                            reference_mapping.insert(format!("{}.{}", step.node_id, field), value.clone());
                        }
                        log.record_step(StepLogEntry {
                            branch_id: branch.id.clone(),
                            node_id: step.node_id,
                            enricher_name: enricher_name.clone(),
                            inputs: Record::new(),
                            outputs: Some(outputs.clone()),
                            status: "completed".to_string(),
                            error: None,
                            timestamp: Utc::now(),
                            execution_time_ms,
                            cache_hit,
                        });
                        step_results.push(StepResult {
                            node_id: step.node_id,
                            enricher_name,
                            status: StepStatus::Completed,
                            outputs: Some(outputs),
                            error: None,
                        });
                    }
                    Err(err) => {
                        warn!(node_id = %step.node_id, error = %err, "step failed, aborting run");
                        log.record_step(StepLogEntry {
                            branch_id: branch.id.clone(),
                            node_id: step.node_id,
                            enricher_name: enricher_name.clone(),
                            inputs: Record::new(),
                            outputs: None,
                            status: "error".to_string(),
                            error: Some(err.message().to_string()),
                            timestamp: Utc::now(),
                            execution_time_ms,
                            cache_hit: false,
                        });
                        step_results.push(StepResult {
                            node_id: step.node_id,
                            enricher_name,
                            status: StepStatus::Error,
                            outputs: None,
                            error: Some(err.message().to_string()),
                        });
                        aborted = true;
                        break;
                    }
                }
            }

            branch_results.push(BranchResult {
                id: branch.id.clone(),
                name: branch.name.clone(),
                steps: step_results,
            });
        }

        if aborted {
            log.finish_failed();
        } else {
            log.finish_completed(reference_mapping.clone());
        }

        let result = ExecutionResult {
            initial_values: seed_values.clone(),
            branches: branch_results,
            results: live_outputs,
            reference_mapping,
        };
        Ok((result, log))
    }

    /// Resolve one step's real inputs and run it, returning its outputs and
    /// whether the per-run cache was hit.
    async fn run_step(
        &self,
        step: &Step,
        index: usize,
        incoming: &HashMap<NodeId, Vec<&FlowEdge>>,
        seed_values: &Record,
        live_outputs: &HashMap<NodeId, Record>,
        cache: &mut HashMap<(NodeId, String), Record>,
        scope: Scope,
    ) -> Result<(Record, bool), FlowError> {
        match &step.kind {
            StepKind::Type => Ok((bind_seed_value(step, seed_values)?, false)),
            StepKind::Error { message } => Err(FlowError::validation(message.clone())),
            StepKind::Enricher { name } => {
                let enricher = self.enrichers.get(name)?;

                let mut inputs = resolve_real_inputs(step.node_id, incoming, live_outputs);
                if inputs.is_empty() && index == 0 {
                    if let Some(key) = enricher.metadata().primary_input_key() {
                        if let Some(value) = seed_values.get(key) {
                            inputs.insert(key.to_string(), value.clone());
                        }
                    }
                }

                let resolved_params =
                    resolve_params(enricher.metadata(), &step.params, &self.secrets, scope.user_id()).await?;
                let combined = json!({"input": inputs, "params": resolved_params});
                let cache_key = (
                    step.node_id,
                    serde_json::to_string(&combined).unwrap_or_default(),
                );

                if let Some(cached) = cache.get(&cache_key) {
                    return Ok((cached.clone(), true));
                }

                let output = enricher.execute(combined, &*self.graph, scope).await?;
                let outputs = value_to_record(output);
                cache.insert(cache_key, outputs.clone());
                Ok((outputs, false))
            }
        }
    }
}

fn group_by_target(edges: &[FlowEdge]) -> HashMap<NodeId, Vec<&FlowEdge>> {
    let mut map: HashMap<NodeId, Vec<&FlowEdge>> = HashMap::new();
    for edge in edges {
        map.entry(edge.target_node).or_default().push(edge);
    }
    map
}

fn resolve_real_inputs(
    node_id: NodeId,
    incoming: &HashMap<NodeId, Vec<&FlowEdge>>,
    live_outputs: &HashMap<NodeId, Record>,
) -> Record {
    let mut inputs = Record::new();
    let Some(edges) = incoming.get(&node_id) else {
        return inputs;
    };
    for edge in edges {
        let Some(source_outputs) = live_outputs.get(&edge.source_node) else {
            continue;
        };
        if let Some(value) = source_outputs.get(&edge.source_handle) {
            inputs.insert(edge.target_handle.clone(), value.clone());
        }
    }
    inputs
}

fn bind_seed_value(step: &Step, seed_values: &Record) -> Result<Record, FlowError> {
    let field_name = step.outputs.keys().next().cloned().ok_or_else(|| {
        FlowError::engine(format!("type step {} has no declared output field", step.node_id))
    })?;

    let bound = if let Some(value) = seed_values.get(&field_name) {
        value.clone()
    } else if seed_values.len() == 1 {
        seed_values.values().next().cloned().unwrap()
    } else {
        Value::Object(seed_values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    };

    let mut outputs = Record::new();
    outputs.insert(field_name, bound);
    Ok(outputs)
}

fn value_to_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        other => {
            let mut record = Record::new();
            record.insert("value".to_string(), other);
            record
        }
    }
}

fn enricher_name_of(step: &Step) -> Option<String> {
    match &step.kind {
        StepKind::Enricher { name } => Some(name.clone()),
        _ => None,
    }
}
