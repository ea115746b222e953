//! Route definitions and router construction.

use axum::Router;
use axum::http::HeaderValue;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::middleware::lease_worker;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(e) => {
                        warn!(origin = %origin, error = %e, "Ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Routes nested under `/api`.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Entities API
        .route(
            "/entities",
            get(handlers::entities::list).post(handlers::entities::create),
        )
        .route("/entities/search", get(handlers::entities::search))
        .route(
            "/entities/with-description",
            get(handlers::entities::with_description),
        )
        .route(
            "/entities/{id}",
            get(handlers::entities::get)
                .put(handlers::entities::update)
                .delete(handlers::entities::remove),
        )
        // Test scenarios API
        .route("/test/health", get(handlers::scenarios::health))
        .route("/test/block-thread", post(handlers::scenarios::block_thread))
        .route("/test/hang", post(handlers::scenarios::hang_thread))
        .route("/test/thread-status", get(handlers::scenarios::thread_status))
        .route("/test/cpu-intensive", post(handlers::scenarios::cpu_intensive))
}

/// Routes nested under `/actuator`.
pub(crate) fn actuator_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::actuator::health))
        .route("/info", get(handlers::actuator::info))
        .route("/restart-monitor", get(handlers::actuator::restart_monitor))
}

/// Create the main Axum router.
///
/// Every route, the fallback included, runs behind the worker lease
/// middleware. CORS and request tracing wrap the lease so preflight
/// requests never wait for a worker.
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{id}`
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .nest("/api", api_routes())
        .nest("/actuator", actuator_routes())
        .route("/v3/api-docs", get(handlers::docs::api_docs))
        .layer(from_fn_with_state(Arc::clone(&state), lease_worker))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_config))
        .with_state(state)
}
