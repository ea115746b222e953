//! API documentation handler.

use axum::Json;
use axum::extract::State;

use crate::openapi;
use crate::state::AppState;

/// OpenAPI 3.0 document for every route this server exposes.
pub async fn api_docs(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(openapi::document(&state.config.service_name))
}
