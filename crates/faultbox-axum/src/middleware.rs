//! Request worker leasing.
//!
//! Every request holds one slot of the [`WorkerPool`](faultbox_runtime::WorkerPool)
//! until its response is produced. When all slots are busy, new requests
//! queue here, health checks included.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use crate::error::HttpError;
use crate::state::AppState;

/// Name of the worker serving the current request, e.g. `http-worker-2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker(pub String);

/// Lease a worker, expose it to the handler, and hold it until the
/// handler returns.
pub async fn lease_worker(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let lease = state.workers.acquire().await?;
    let worker = lease.name().to_string();
    req.extensions_mut().insert(Worker(worker.clone()));

    let response = next
        .run(req)
        .instrument(tracing::debug_span!("worker", name = %worker))
        .await;

    drop(lease);
    Ok(response)
}
