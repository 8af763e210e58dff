use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flowsint_error::FlowError;
use serde_json::json;

/// Wraps [`FlowError`] so a handler can simply `?` a `Result<_, FlowError>`
/// and have it map to an HTTP response per the error payload rules: 4xx for
/// missing nodes, unknown enrichers, and invalid schema; 5xx with
/// `{detail: message}` for engine/queue failures.
pub struct ApiError(pub FlowError);

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "detail": self.0.message() }))).into_response()
    }
}
