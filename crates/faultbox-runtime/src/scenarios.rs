//! Fault scenarios that occupy a request worker.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Longest single sleep while hanging, so progress is logged regularly.
const HANG_CHUNK: Duration = Duration::from_secs(10);

/// CPU burn logs progress every this many iterations.
const BURN_LOG_EVERY: u64 = 1_000_000;

/// CPU burn polls the cancellation token every this many iterations.
const BURN_CANCEL_EVERY: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("CPU burn task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of [`hang`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HangOutcome {
    pub interrupted: bool,
    pub elapsed: Duration,
}

/// Result of [`burn_cpu`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuBurnOutcome {
    pub interrupted: bool,
    pub iterations: u64,
    pub elapsed_secs: f64,
    /// Integer part of the accumulated result.
    pub checksum: i64,
}

/// Sleep for `seconds` without holding any lock.
///
/// Stops early when `cancel` fires.
pub async fn hang(worker: &str, seconds: u64, cancel: &CancellationToken) -> HangOutcome {
    let total = Duration::from_secs(seconds);
    let start = Instant::now();
    info!(worker, seconds, "Hang started");

    let mut interrupted = false;
    loop {
        let elapsed = start.elapsed();
        if elapsed >= total {
            break;
        }
        let chunk = (total - elapsed).min(HANG_CHUNK);

        tokio::select! {
            () = tokio::time::sleep(chunk) => {
                debug!(worker, elapsed_secs = start.elapsed().as_secs(), "Still hanging");
            }
            () = cancel.cancelled() => {
                interrupted = true;
                break;
            }
        }
    }

    let elapsed = start.elapsed();
    if interrupted {
        warn!(worker, elapsed = ?elapsed, "Hang interrupted");
    } else {
        info!(worker, elapsed = ?elapsed, "Hang completed");
    }

    HangOutcome {
        interrupted,
        elapsed,
    }
}

/// Spin a blocking-pool thread on floating point work for `seconds`.
///
/// Stops early when `cancel` fires.
pub async fn burn_cpu(
    seconds: u64,
    cancel: &CancellationToken,
) -> Result<CpuBurnOutcome, ScenarioError> {
    let cancel = cancel.clone();
    let outcome =
        tokio::task::spawn_blocking(move || burn(Duration::from_secs(seconds), &cancel)).await?;

    if outcome.interrupted {
        warn!(
            iterations = outcome.iterations,
            elapsed_secs = outcome.elapsed_secs,
            "CPU burn interrupted"
        );
    } else {
        info!(
            iterations = outcome.iterations,
            elapsed_secs = outcome.elapsed_secs,
            "CPU burn completed"
        );
    }
    Ok(outcome)
}

#[allow(clippy::cast_possible_truncation)]
fn burn(duration: Duration, cancel: &CancellationToken) -> CpuBurnOutcome {
    let mut rng = rand::thread_rng();
    let start = std::time::Instant::now();
    let mut iterations: u64 = 0;
    let mut result = 0.0_f64;
    let mut interrupted = false;

    while start.elapsed() < duration {
        if iterations % BURN_CANCEL_EVERY == 0 && cancel.is_cancelled() {
            interrupted = true;
            break;
        }
        result += rng.gen_range(0.0..1_000_000.0_f64).sqrt();
        iterations += 1;
        if iterations % BURN_LOG_EVERY == 0 {
            debug!(iterations, "CPU burn progress");
        }
    }

    CpuBurnOutcome {
        interrupted,
        iterations,
        elapsed_secs: start.elapsed().as_secs_f64(),
        checksum: result as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_hang_runs_full_duration() {
        let cancel = CancellationToken::new();
        let outcome = hang("w-1", 25, &cancel).await;

        assert!(!outcome.interrupted);
        assert!(outcome.elapsed >= Duration::from_secs(25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang_zero_seconds_returns_immediately() {
        let cancel = CancellationToken::new();
        let outcome = hang("w-1", 0, &cancel).await;

        assert!(!outcome.interrupted);
        assert_eq!(outcome.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move { hang("w-1", 90, &cancel).await })
        };

        tokio::time::sleep(Duration::from_secs(15)).await;
        cancel.cancel();

        let outcome = handle.await.unwrap();
        assert!(outcome.interrupted);
        assert!(outcome.elapsed < Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_burn_cpu_zero_seconds() {
        let outcome = burn_cpu(0, &CancellationToken::new()).await.unwrap();
        assert!(!outcome.interrupted);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.checksum, 0);
    }

    #[tokio::test]
    async fn test_burn_cpu_stops_when_already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let started = std::time::Instant::now();
        let outcome = burn_cpu(2, &cancel).await.unwrap();

        assert!(outcome.interrupted);
        assert_eq!(outcome.iterations, 0);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_burn_cpu_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let handle = {
            let cancel = cancel.clone();
            tokio::spawn(async move { burn_cpu(30, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        let started = std::time::Instant::now();
        cancel.cancel();

        let outcome = handle.await.unwrap().unwrap();
        assert!(outcome.interrupted);
        assert!(outcome.elapsed_secs < 30.0);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_burn_produces_positive_checksum() {
        let outcome = burn(Duration::from_millis(20), &CancellationToken::new());
        assert!(!outcome.interrupted);
        assert!(outcome.iterations > 0);
        assert!(outcome.checksum >= 0);
        assert!(outcome.elapsed_secs >= 0.02);
    }
}
