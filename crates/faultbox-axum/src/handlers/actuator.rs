//! Actuator handlers - health, info and restart monitor.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use faultbox_core::RestartInfo;
use faultbox_db::CoreFactory;
use tracing::{debug, warn};

use crate::dto::{AppInfo, HealthResponse, InfoResponse};
use crate::state::AppState;

/// `UP` with 200 while the database answers, `DOWN` with 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db = CoreFactory::ping(&state.pool)
        .await
        .map_err(|e| e.to_string());

    let health = HealthResponse::from_db(db);
    if health.is_up() {
        debug!("Actuator health UP");
        (StatusCode::OK, Json(health))
    } else {
        warn!(error = ?health.components.db.error, "Actuator health DOWN");
        (StatusCode::SERVICE_UNAVAILABLE, Json(health))
    }
}

pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        app: AppInfo {
            name: state.config.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Failure-injection target service for Kubernetes probe testing"
                .to_string(),
        },
    })
}

/// Restart count and uptime since the last ready event.
pub async fn restart_monitor(State(state): State<AppState>) -> Json<RestartInfo> {
    Json(state.core.restarts().snapshot(Utc::now()).await)
}
