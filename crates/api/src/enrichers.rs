use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, Query, State};
use flowsint_core::{NodeId, SketchId, UserId};
use flowsint_enrichers::{EnricherMetadata, ParamSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Projection of [`EnricherMetadata`] returned by the enricher listing
/// endpoints.
#[derive(Debug, Serialize)]
pub struct EnricherDescriptor {
    pub name: String,
    pub category: String,
    pub input_types: Vec<String>,
    pub excluded_input_types: Vec<String>,
    pub output_fields: Vec<String>,
    pub primary_input_key: Option<String>,
    pub params_schema: Vec<ParamSpec>,
    pub required_params: bool,
    /// `true` when this descriptor is returned because the requested
    /// category names a user-owned custom type rather than a recognized
    /// enricher category — in that case every enricher is listed, flagged,
    /// rather than filtered down to none.
    #[serde(rename = "wobblyType")]
    pub wobbly_type: bool,
}

impl EnricherDescriptor {
    fn from_metadata(metadata: &EnricherMetadata, wobbly_type: bool) -> Self {
        Self {
            name: metadata.name().to_string(),
            category: metadata.category().to_string(),
            input_types: metadata.input_types().to_vec(),
            excluded_input_types: metadata.excluded_input_types().to_vec(),
            output_fields: metadata.output_fields().to_vec(),
            primary_input_key: metadata.primary_input_key().map(str::to_string),
            params_schema: metadata.params().to_vec(),
            required_params: metadata.params().iter().any(|p| p.required),
            wobbly_type,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListEnrichersQuery {
    pub category: Option<String>,
}

/// `GET /enrichers/?category=X`
pub async fn list_enrichers(
    State(state): State<AppState>,
    Query(query): Query<ListEnrichersQuery>,
) -> Json<Vec<EnricherDescriptor>> {
    let all = state.enrichers.list();

    let Some(category) = query.category else {
        return Json(
            all.iter()
                .map(|e| EnricherDescriptor::from_metadata(e.metadata(), false))
                .collect(),
        );
    };

    let known_categories: HashSet<&str> = all.iter().map(|e| e.metadata().category()).collect();
    if known_categories.contains(category.as_str()) {
        Json(
            all.iter()
                .filter(|e| e.metadata().category() == category)
                .map(|e| EnricherDescriptor::from_metadata(e.metadata(), false))
                .collect(),
        )
    } else {
        Json(
            all.iter()
                .map(|e| EnricherDescriptor::from_metadata(e.metadata(), true))
                .collect(),
        )
    }
}

/// `GET /flows/input_type/{t}`
pub async fn list_enrichers_for_input_type(
    State(state): State<AppState>,
    Path(input_type): Path<String>,
) -> Json<Vec<EnricherDescriptor>> {
    Json(
        state
            .enrichers
            .list_for_input_type(&input_type)
            .iter()
            .map(|e| EnricherDescriptor::from_metadata(e.metadata(), false))
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
pub struct LaunchEnricherRequest {
    pub node_ids: Vec<NodeId>,
    pub sketch_id: SketchId,
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub id: flowsint_core::ScanId,
}

/// `POST /enrichers/{name}/launch`
///
/// Resolves `node_ids` through the Node Loader before submitting, so an
/// unresolvable node id surfaces as a 404 before any scan row exists.
pub async fn launch_enricher(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<LaunchEnricherRequest>,
) -> Result<Json<LaunchResponse>, ApiError> {
    let cleaned_nodes = state.node_loader.load(&body.node_ids).await?;
    let scan_id = state
        .tasks
        .submit_run_enricher(&name, cleaned_nodes, body.sketch_id, UserId::nil())
        .await?;
    Ok(Json(LaunchResponse { id: scan_id }))
}

/// Enriched raw materials for the flow builder UI: every entity type schema
/// plus every enricher grouped by category.
pub fn raw_materials(state: &AppState) -> Value {
    let types: Vec<Value> = state.types.list().iter().map(|t| t.json_schema()).collect();

    let mut by_category: std::collections::BTreeMap<String, Vec<Value>> = std::collections::BTreeMap::new();
    for enricher in state.enrichers.list() {
        let descriptor = EnricherDescriptor::from_metadata(enricher.metadata(), false);
        by_category
            .entry(descriptor.category.clone())
            .or_default()
            .push(serde_json::to_value(descriptor).unwrap_or(Value::Null));
    }

    let mut items = serde_json::Map::new();
    items.insert("types".to_string(), Value::Array(types));
    for (category, enrichers) in by_category {
        items.insert(category, Value::Array(enrichers));
    }

    serde_json::json!({ "items": items })
}

/// `GET /flows/raw_materials`
pub async fn raw_materials_handler(State(state): State<AppState>) -> Json<Value> {
    Json(raw_materials(&state))
}
