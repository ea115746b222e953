//! Test scenario handlers - deliberately occupy request workers.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use faultbox_runtime::{burn_cpu, hang};
use tracing::{Instrument, info, info_span, warn};

use crate::dto::{
    BlockQuery, BlockResponse, CpuQuery, CpuResponse, HangQuery, HangResponse, PingResponse,
    ThreadStatusResponse,
};
use crate::error::HttpError;
use crate::middleware::Worker;
use crate::state::AppState;

/// Upper bound for every `seconds` parameter.
pub const MAX_SECONDS: u64 = 3600;

fn check_seconds(seconds: u64) -> Result<u64, HttpError> {
    if seconds > MAX_SECONDS {
        return Err(HttpError::BadRequest(format!(
            "seconds must be between 0 and {MAX_SECONDS}, got {seconds}"
        )));
    }
    Ok(seconds)
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Liveness of the scenario API itself.
pub async fn health(State(state): State<AppState>) -> Json<PingResponse> {
    info!("Health check endpoint called");
    Json(PingResponse {
        status: "healthy".to_string(),
        timestamp: now_rfc3339(),
        service: state.config.service_name.clone(),
    })
}

/// Hold the shared lock for `seconds`.
///
/// External calls also fire `max_workers - 1` internal calls back at this
/// server, so every worker ends up holding or waiting for the lock.
pub async fn block_thread(
    State(state): State<AppState>,
    Extension(Worker(worker)): Extension<Worker>,
    query: Result<Query<BlockQuery>, QueryRejection>,
) -> Result<Json<BlockResponse>, HttpError> {
    let Query(BlockQuery { seconds, internal }) = query?;
    let seconds = check_seconds(seconds)?;

    async {
        warn!(
            worker = %worker,
            seconds,
            internal,
            "POST /api/test/block-thread - Blocking worker"
        );

        if !internal {
            let count = state.workers.max().saturating_sub(1);
            // Detached; the loopback requests outlive this handler
            drop(state.fanout.spawn_block_requests(count, seconds));
            info!(
                count,
                max_workers = state.workers.max(),
                "Spawned internal requests to exhaust worker pool"
            );
        }

        let outcome = state
            .lockboard
            .hold(&worker, Duration::from_secs(seconds), &state.cancel)
            .await;

        let message = if outcome.interrupted {
            format!(
                "Thread was interrupted after holding the lock for {} seconds",
                outcome.held.as_secs()
            )
        } else {
            format!("Thread was blocked for {seconds} seconds")
        };

        Ok::<_, HttpError>(Json(BlockResponse {
            message,
            thread: worker.clone(),
            duration: format!("{seconds}s"),
            internal: internal.to_string(),
        }))
    }
    .instrument(info_span!("block-thread-endpoint", seconds, internal))
    .await
}

/// Sleep on the current worker for `seconds` without taking any lock.
pub async fn hang_thread(
    State(state): State<AppState>,
    Extension(Worker(worker)): Extension<Worker>,
    query: Result<Query<HangQuery>, QueryRejection>,
) -> Result<Json<HangResponse>, HttpError> {
    let Query(HangQuery { seconds }) = query?;
    let seconds = check_seconds(seconds)?;

    async {
        warn!(worker = %worker, seconds, "POST /api/test/hang - Hanging worker");

        let outcome = hang(&worker, seconds, &state.cancel).await;
        let message = if outcome.interrupted {
            format!(
                "Thread was interrupted after hanging for {} seconds",
                outcome.elapsed.as_secs()
            )
        } else {
            format!("Thread hung for {seconds} seconds")
        };

        Ok::<_, HttpError>(Json(HangResponse {
            message,
            thread: worker.clone(),
            duration: format!("{seconds}s"),
            completed_at: now_rfc3339(),
        }))
    }
    .instrument(info_span!("hang-thread-endpoint", seconds))
    .await
}

/// Lock contention and worker usage.
pub async fn thread_status(State(state): State<AppState>) -> Json<ThreadStatusResponse> {
    info!("GET /api/test/thread-status - Checking thread status");

    let lock = state.lockboard.status();
    let probe = Arc::clone(&state.probe);
    let total_threads = tokio::task::spawn_blocking(move || probe.snapshot().process_threads)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| tokio::runtime::Handle::current().metrics().num_workers());

    Json(ThreadStatusResponse {
        total_threads,
        active_workers: state.workers.active(),
        max_workers: state.workers.max(),
        waiting_threads: lock.waiting.len(),
        waiting_thread_names: lock.waiting,
        locked_threads: lock.holding.len(),
        locked_thread_names: lock.holding,
        lock_held: lock.lock_held,
        has_queued_threads: lock.has_queued,
        queue_length: lock.queue_length,
        timestamp: now_rfc3339(),
    })
}

/// Burn CPU for `seconds` on the blocking pool while this worker waits.
pub async fn cpu_intensive(
    State(state): State<AppState>,
    Extension(Worker(worker)): Extension<Worker>,
    query: Result<Query<CpuQuery>, QueryRejection>,
) -> Result<Json<CpuResponse>, HttpError> {
    let Query(CpuQuery { seconds }) = query?;
    let seconds = check_seconds(seconds)?;

    async {
        warn!(
            worker = %worker,
            seconds,
            "POST /api/test/cpu-intensive - Starting CPU intensive task"
        );

        let outcome = burn_cpu(seconds, &state.cancel).await?;
        let elapsed = Duration::from_secs_f64(outcome.elapsed_secs).as_secs();
        let message = if outcome.interrupted {
            format!("CPU intensive task was interrupted after {elapsed} seconds")
        } else {
            "CPU intensive task completed".to_string()
        };

        Ok::<_, HttpError>(Json(CpuResponse {
            message,
            thread: worker.clone(),
            iterations: outcome.iterations.to_string(),
            duration: format!("{elapsed}s"),
            result_checksum: outcome.checksum.to_string(),
        }))
    }
    .instrument(info_span!("cpu-intensive-endpoint", seconds))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_seconds_bounds() {
        assert_eq!(check_seconds(0).unwrap(), 0);
        assert_eq!(check_seconds(MAX_SECONDS).unwrap(), MAX_SECONDS);
        assert!(matches!(
            check_seconds(MAX_SECONDS + 1),
            Err(HttpError::BadRequest(_))
        ));
    }
}
