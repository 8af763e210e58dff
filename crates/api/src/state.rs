use std::sync::Arc;

use flowsint_enrichers::EnricherRegistry;
use flowsint_graph::NodeLoader;
use flowsint_tasks::TaskRuntime;
use flowsint_types::TypeRegistry;

use crate::flows::FlowStore;
use crate::schema::RegistryEnricherSchema;

/// Shared handles every route handler needs, cloned cheaply per request
/// since every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub types: Arc<TypeRegistry>,
    pub enrichers: Arc<EnricherRegistry>,
    pub node_loader: Arc<NodeLoader>,
    pub tasks: Arc<TaskRuntime>,
    pub flows: Arc<FlowStore>,
    pub enricher_schema: Arc<RegistryEnricherSchema>,
}
