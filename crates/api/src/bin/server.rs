use std::sync::Arc;

use flowsint_api::{AppState, FlowStore, RegistryEnricherSchema, build_router};
use flowsint_enrichers::EnricherRegistry;
use flowsint_graph::{InMemoryGraphBackend, NodeLoader};
use flowsint_secrets::{InMemoryBackend, SecretStore};
use flowsint_tasks::{TaskRuntime, TaskRuntimeConfig};
use flowsint_types::TypeRegistry;

#[tokio::main]
async fn main() {
    flowsint_log::init(flowsint_log::Config::from_env()).expect("failed to initialize logging");

    let types = Arc::new(TypeRegistry::new());
    let enrichers = Arc::new(EnricherRegistry::new());
    let graph_backend: Arc<dyn flowsint_graph::GraphBackend> = Arc::new(InMemoryGraphBackend::new());
    let node_loader = Arc::new(NodeLoader::new(Arc::clone(&graph_backend)));
    let secrets = Arc::new(SecretStore::new(Arc::new(InMemoryBackend::new())));
    let tasks = Arc::new(TaskRuntime::new(
        Arc::clone(&enrichers),
        secrets,
        Arc::clone(&graph_backend),
        TaskRuntimeConfig::from_env(),
    ));
    let flows = Arc::new(FlowStore::new());
    let enricher_schema = Arc::new(RegistryEnricherSchema::new(Arc::clone(&enrichers)));

    let state = AppState {
        types,
        enrichers,
        node_loader,
        tasks,
        flows,
        enricher_schema,
    };

    let addr = std::env::var("FLOWSINT_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.expect("failed to bind address");
    tracing::info!(%addr, "flowsint api listening");

    axum::serve(listener, build_router(state))
        .await
        .expect("server error");
}
