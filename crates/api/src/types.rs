use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::state::AppState;

/// `GET /types/` — categorized list of every registered entity type's JSON
/// Schema, built-in and user-defined alike (the registry draws no
/// distinction between the two).
pub async fn list_types(State(state): State<AppState>) -> Json<Value> {
    let schemas: Vec<Value> = state.types.list().iter().map(|t| t.json_schema()).collect();
    Json(serde_json::json!({ "types": schemas }))
}
