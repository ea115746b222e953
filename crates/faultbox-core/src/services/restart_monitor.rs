//! Restart monitor - tracks application starts and uptime.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{RestartInfo, format_uptime};
use crate::ports::LifecycleRepository;

#[derive(Debug, Clone, Copy)]
struct ReadyState {
    restart_count: u64,
    ready_at: DateTime<Utc>,
}

/// Tracks the ready event of this process and the persisted start count.
///
/// Before [`RestartMonitor::mark_ready`] is called the report shows zero
/// restarts and `"Not started"` uptime.
pub struct RestartMonitor {
    lifecycle: Arc<dyn LifecycleRepository>,
    started_at: DateTime<Utc>,
    ready: RwLock<Option<ReadyState>>,
}

impl RestartMonitor {
    /// Create a monitor for a process that started at `started_at`.
    pub fn new(lifecycle: Arc<dyn LifecycleRepository>, started_at: DateTime<Utc>) -> Self {
        Self {
            lifecycle,
            started_at,
            ready: RwLock::new(None),
        }
    }

    /// Wall-clock time the process started.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Record that the application is ready to serve requests.
    ///
    /// Persists a start record and returns the restart count. Storage
    /// failures are logged and fall back to counting in memory.
    pub async fn mark_ready(&self) -> u64 {
        let now = Utc::now();
        let mut ready = self.ready.write().await;

        let restart_count = match self.lifecycle.record_start(now).await {
            Ok(record) => record.start_count,
            Err(e) => {
                warn!(error = %e, "Failed to persist start record, counting in memory");
                ready.map_or(0, |r| r.restart_count) + 1
            }
        };

        *ready = Some(ReadyState {
            restart_count,
            ready_at: now,
        });

        info!(
            count = restart_count,
            ready_at = %now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "Application restart detected"
        );
        restart_count
    }

    /// Build the restart report as of `now`.
    pub async fn snapshot(&self, now: DateTime<Utc>) -> RestartInfo {
        let ready = *self.ready.read().await;
        let current_time = now.to_rfc3339_opts(SecondsFormat::Millis, true);

        match ready {
            Some(state) => {
                let elapsed = (now.timestamp() - state.ready_at.timestamp()).max(0);
                RestartInfo {
                    restart_count: state.restart_count,
                    last_start_time: Some(
                        self.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                    ),
                    application_ready_time: Some(
                        state.ready_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                    ),
                    uptime: format_uptime(elapsed.unsigned_abs()),
                    current_time,
                }
            }
            None => RestartInfo {
                restart_count: 0,
                last_start_time: None,
                application_ready_time: None,
                uptime: "Not started".to_string(),
                current_time,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{FailingLifecycleRepo, MemoryLifecycleRepo};
    use chrono::Duration;

    #[tokio::test]
    async fn test_snapshot_before_ready() {
        let monitor = RestartMonitor::new(Arc::new(MemoryLifecycleRepo::default()), Utc::now());
        let info = monitor.snapshot(Utc::now()).await;

        assert_eq!(info.restart_count, 0);
        assert_eq!(info.uptime, "Not started");
        assert!(info.application_ready_time.is_none());
        assert!(info.last_start_time.is_none());
    }

    #[tokio::test]
    async fn test_mark_ready_increments_persisted_count() {
        let monitor = RestartMonitor::new(Arc::new(MemoryLifecycleRepo::with_count(4)), Utc::now());
        assert_eq!(monitor.mark_ready().await, 5);

        let info = monitor.snapshot(Utc::now()).await;
        assert_eq!(info.restart_count, 5);
        assert!(info.application_ready_time.is_some());
        assert!(info.last_start_time.is_some());
    }

    #[tokio::test]
    async fn test_uptime_is_measured_from_ready() {
        let monitor = RestartMonitor::new(Arc::new(MemoryLifecycleRepo::default()), Utc::now());
        monitor.mark_ready().await;

        let later = Utc::now() + Duration::seconds(3725);
        let info = monitor.snapshot(later).await;
        assert!(info.uptime == "01:02:05" || info.uptime == "01:02:06");
    }

    #[tokio::test]
    async fn test_storage_failure_counts_in_memory() {
        let monitor = RestartMonitor::new(Arc::new(FailingLifecycleRepo), Utc::now());
        assert_eq!(monitor.mark_ready().await, 1);
        assert_eq!(monitor.mark_ready().await, 2);
    }
}
