use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use flowsint_core::{Record, ScanId, Scope, SketchId, UserId, Value};
use flowsint_enrichers::EnricherRegistry;
use flowsint_error::FlowError;
use flowsint_flow::{Branch, FlowEdge};
use flowsint_graph::GraphBackend;
use flowsint_orchestrator::{ExecutionLog, Orchestrator};
use flowsint_secrets::SecretStore;
use serde_json::json;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::TaskRuntimeConfig;
use crate::scan::Scan;

/// Submits enricher and flow runs and tracks their [`Scan`] rows.
///
/// Bounds concurrent work with a semaphore sized to
/// [`TaskRuntimeConfig::worker_count`]: a submission that exceeds the
/// configured concurrency waits for a permit before it starts, modeling a
/// process-wide worker pool without a separate queue process. Each
/// `submit_*` call runs its job to completion before returning; a caller
/// that wants fire-and-forget submission wraps the call in `tokio::spawn`
/// itself.
pub struct TaskRuntime {
    enrichers: Arc<EnricherRegistry>,
    secrets: Arc<SecretStore>,
    graph: Arc<dyn GraphBackend>,
    scans: DashMap<ScanId, Scan>,
    permits: Arc<Semaphore>,
    log_dir: PathBuf,
}

impl TaskRuntime {
    /// Build a runtime over the process-wide enricher registry, secret
    /// store, and graph writer, bounded to `config.worker_count` concurrent
    /// jobs.
    pub fn new(
        enrichers: Arc<EnricherRegistry>,
        secrets: Arc<SecretStore>,
        graph: Arc<dyn GraphBackend>,
        config: TaskRuntimeConfig,
    ) -> Self {
        Self {
            enrichers,
            secrets,
            graph,
            scans: DashMap::new(),
            permits: Arc::new(Semaphore::new(config.worker_count.max(1))),
            log_dir: config.log_dir,
        }
    }

    /// Look up a scan's current state.
    pub fn get_scan(&self, id: ScanId) -> Option<Scan> {
        self.scans.get(&id).map(|entry| entry.clone())
    }

    /// Run a single registered enricher over `cleaned_nodes`.
    ///
    /// An unknown enricher name is a [`FlowError::not_found`] returned
    /// before any [`Scan`] row is created, matching the Enricher Registry's
    /// HTTP 404 contract. Once the job is accepted, per-item failures
    /// inside the batch never abort the whole scan: each input is attempted
    /// independently and the scan completes with a mix of outputs and
    /// recorded errors.
    pub async fn submit_run_enricher(
        &self,
        enricher_name: &str,
        cleaned_nodes: Vec<Record>,
        sketch_id: SketchId,
        user_id: UserId,
    ) -> Result<ScanId, FlowError> {
        let enricher = self.enrichers.get(enricher_name)?;

        let scan = Scan::pending(sketch_id);
        let scan_id = scan.id;
        self.scans.insert(scan_id, scan);

        let _permit = self.permits.acquire().await.expect("semaphore never closed");
        info!(scan_id = %scan_id, enricher = enricher_name, "running enricher batch");

        let scope = Scope::new(sketch_id, user_id);
        let inputs: Vec<Value> = cleaned_nodes.into_iter().map(record_to_value).collect();
        let results = enricher.execute_batch(inputs, &*self.graph, scope).await;
        let combined = combine_batch_outputs(results);

        if let Some(mut scan) = self.scans.get_mut(&scan_id) {
            scan.complete(combined);
        }

        Ok(scan_id)
    }

    /// Run a compiled flow's branches against the orchestrator.
    ///
    /// The scan is created up front and always reaches `completed` or
    /// `failed`: a step error recorded by the orchestrator (missing secret,
    /// validation failure, enricher error) fails the scan with that step's
    /// message rather than propagating as an error from this call; only an
    /// orchestrator-internal invariant violation does.
    pub async fn submit_run_flow(
        &self,
        branches: Vec<Branch>,
        edges: Vec<FlowEdge>,
        seed_values: Record,
        sketch_id: SketchId,
        user_id: UserId,
    ) -> ScanId {
        let scan = Scan::pending(sketch_id);
        let scan_id = scan.id;
        self.scans.insert(scan_id, scan);

        let _permit = self.permits.acquire().await.expect("semaphore never closed");
        info!(scan_id = %scan_id, "running flow");

        let orchestrator = Orchestrator::new(
            Arc::clone(&self.enrichers),
            Arc::clone(&self.secrets),
            Arc::clone(&self.graph),
        );
        let scope = Scope::new(sketch_id, user_id);

        match orchestrator.execute(&branches, &edges, &seed_values, scope).await {
            Ok((result, log)) => {
                self.write_execution_log(sketch_id, scan_id, &log).await;
                if let Some(mut scan) = self.scans.get_mut(&scan_id) {
                    if result.has_failed_step() {
                        let message = result
                            .branches
                            .iter()
                            .flat_map(|b| &b.steps)
                            .find_map(|s| s.error.clone())
                            .unwrap_or_else(|| "step failed".to_string());
                        scan.fail(message);
                    } else {
                        scan.complete(result.reference_mapping.clone());
                    }
                }
            }
            Err(err) => {
                warn!(scan_id = %scan_id, error = %err, "flow run failed with an engine error");
                if let Some(mut scan) = self.scans.get_mut(&scan_id) {
                    scan.fail(err.message().to_string());
                }
            }
        }

        scan_id
    }

    /// Write a run's execution log to `enricher_execution_<sketch>_<scan>.json`
    /// under the configured log directory. A write failure is logged and
    /// swallowed: a missing log file never fails an otherwise-successful scan.
    async fn write_execution_log(&self, sketch_id: SketchId, scan_id: ScanId, log: &ExecutionLog) {
        if let Err(err) = tokio::fs::create_dir_all(&self.log_dir).await {
            warn!(error = %err, dir = %self.log_dir.display(), "failed to create execution log directory");
            return;
        }
        let path = self
            .log_dir
            .join(format!("enricher_execution_{sketch_id}_{scan_id}.json"));
        let body = match serde_json::to_vec_pretty(log) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "failed to serialize execution log");
                return;
            }
        };
        if let Err(err) = tokio::fs::write(&path, body).await {
            warn!(error = %err, path = %path.display(), "failed to write execution log");
        }
    }
}

fn record_to_value(record: Record) -> Value {
    Value::Object(record.into_iter().collect())
}

fn combine_batch_outputs(results: Vec<Result<Value, FlowError>>) -> Record {
    results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            let value = result.unwrap_or_else(|err| json!({ "error": err.message() }));
            (index.to_string(), value)
        })
        .collect()
}
