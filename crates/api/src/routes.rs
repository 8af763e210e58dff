use axum::{Json, Router};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::enrichers::{launch_enricher, list_enrichers, list_enrichers_for_input_type, raw_materials_handler};
use crate::flow_routes::{compute_flow, create_flow, delete_flow, get_flow, launch_flow, list_flows, update_flow};
use crate::state::AppState;
use crate::types::list_types;

/// Assemble the full HTTP router over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/enrichers/", get(list_enrichers))
        .route("/enrichers/{name}/launch", post(launch_enricher))
        .route("/flows/", get(list_flows))
        .route("/flows/raw_materials", get(raw_materials_handler))
        .route("/flows/input_type/{t}", get(list_enrichers_for_input_type))
        .route("/flows/create", post(create_flow))
        .route(
            "/flows/{id}",
            get(get_flow).put(update_flow).delete(delete_flow),
        )
        .route("/flows/{id}/launch", post(launch_flow))
        .route("/flows/{id}/compute", post(compute_flow))
        .route("/types/", get(list_types))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
