use axum::Json;
use axum::extract::{Path, State};
use flowsint_core::{NodeId, Record, SketchId, UserId, Value};
use flowsint_core::FlowId;
use flowsint_flow::{FlowEdge, FlowNode, compile};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::flows::{FlowInput, FlowRecord, FlowSummary};
use crate::state::AppState;

/// `GET /flows/`
pub async fn list_flows(State(state): State<AppState>) -> Json<Vec<FlowSummary>> {
    Json(state.flows.list())
}

/// `POST /flows/create`
pub async fn create_flow(State(state): State<AppState>, Json(input): Json<FlowInput>) -> Json<FlowRecord> {
    Json(state.flows.create(input))
}

/// `GET /flows/{id}`
pub async fn get_flow(State(state): State<AppState>, Path(id): Path<FlowId>) -> Result<Json<FlowRecord>, ApiError> {
    Ok(Json(state.flows.get(id)?))
}

/// `PUT /flows/{id}`
pub async fn update_flow(
    State(state): State<AppState>,
    Path(id): Path<FlowId>,
    Json(input): Json<FlowInput>,
) -> Result<Json<FlowRecord>, ApiError> {
    Ok(Json(state.flows.update(id, input)?))
}

/// `DELETE /flows/{id}`
pub async fn delete_flow(State(state): State<AppState>, Path(id): Path<FlowId>) -> Result<(), ApiError> {
    state.flows.delete(id)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct LaunchFlowRequest {
    pub node_ids: Vec<NodeId>,
    pub sketch_id: SketchId,
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub id: flowsint_core::ScanId,
}

/// `POST /flows/{id}/launch`
///
/// Loads `node_ids` through the Node Loader, merges their cleaned records
/// into one seed record (a later node's field wins over an earlier one on
/// overlap), compiles the stored flow's graph against the real enricher
/// registry, and hands the result to the Task Runtime.
pub async fn launch_flow(
    State(state): State<AppState>,
    Path(id): Path<FlowId>,
    Json(body): Json<LaunchFlowRequest>,
) -> Result<Json<LaunchResponse>, ApiError> {
    let flow = state.flows.get(id)?;
    let cleaned_nodes = state.node_loader.load(&body.node_ids).await?;
    let seed_values = merge_records(cleaned_nodes);

    let seed_preview = Value::Object(seed_values.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
    let branches = compile(
        &seed_preview,
        &flow.flow_schema.nodes,
        &flow.flow_schema.edges,
        &*state.enricher_schema,
    );

    let scan_id = state
        .tasks
        .submit_run_flow(
            branches,
            flow.flow_schema.edges.clone(),
            seed_values,
            body.sketch_id,
            UserId::nil(),
        )
        .await;
    Ok(Json(LaunchResponse { id: scan_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub input_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeResponse {
    pub flow_branches: Vec<flowsint_flow::Branch>,
    pub initial_data: Value,
}

/// `POST /flows/{id}/compute`
///
/// Compile-only preview: never touches the Task Runtime or the stored
/// flow's own schema, since the UI sends the graph it is currently
/// editing. `id` identifies which flow the preview belongs to for logging
/// purposes only.
pub async fn compute_flow(
    State(state): State<AppState>,
    Path(_id): Path<FlowId>,
    Json(body): Json<ComputeRequest>,
) -> Json<ComputeResponse> {
    let initial_data = preview_seed_value(&state, body.input_type.as_deref());
    let flow_branches = compile(&initial_data, &body.nodes, &body.edges, &*state.enricher_schema);
    Json(ComputeResponse {
        flow_branches,
        initial_data,
    })
}

fn preview_seed_value(state: &AppState, input_type: Option<&str>) -> Value {
    let Some(type_name) = input_type else {
        return Value::String("sample".to_string());
    };
    let Ok(entity_type) = state.types.get(type_name) else {
        return Value::String("sample".to_string());
    };
    let fields: serde_json::Map<String, Value> = entity_type
        .fields()
        .iter()
        .map(|f| (f.name.clone(), Value::String(format!("<{}>", f.name))))
        .collect();
    Value::Object(fields)
}

fn merge_records(records: Vec<Record>) -> Record {
    let mut merged = Record::new();
    for record in records {
        merged.extend(record);
    }
    merged
}
