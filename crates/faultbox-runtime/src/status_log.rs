//! Scheduled status logging.
//!
//! Four independent periodic jobs write heartbeat, system, database and
//! detailed status lines. All of them stop when the shared cancellation
//! token fires.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use faultbox_core::AppCore;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::system::SystemProbe;
use crate::workers::WorkerPool;

/// Intervals and switches for [`StatusLogger`].
#[derive(Debug, Clone)]
pub struct StatusLogConfig {
    pub enabled: bool,
    pub heartbeat_every: Duration,
    pub system_every: Duration,
    pub database_every: Duration,
    pub detailed_every: Duration,
    pub service_name: String,
}

impl Default for StatusLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heartbeat_every: Duration::from_secs(30),
            system_every: Duration::from_secs(60),
            database_every: Duration::from_secs(120),
            detailed_every: Duration::from_secs(300),
            service_name: "faultbox".to_string(),
        }
    }
}

/// Owns the state the periodic status jobs report on.
pub struct StatusLogger {
    core: Arc<AppCore>,
    workers: Arc<WorkerPool>,
    probe: Arc<SystemProbe>,
    config: StatusLogConfig,
    heartbeats: AtomicU64,
}

impl StatusLogger {
    pub fn new(
        core: Arc<AppCore>,
        workers: Arc<WorkerPool>,
        probe: Arc<SystemProbe>,
        config: StatusLogConfig,
    ) -> Self {
        Self {
            core,
            workers,
            probe,
            config,
            heartbeats: AtomicU64::new(0),
        }
    }

    /// Number of heartbeats logged so far.
    pub fn heartbeats(&self) -> u64 {
        self.heartbeats.load(Ordering::Relaxed)
    }

    /// Start all jobs. Returns no handles when logging is disabled.
    pub fn spawn(self: Arc<Self>, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        if !self.config.enabled {
            info!("Scheduled status logging disabled");
            return Vec::new();
        }

        info!(
            heartbeat = ?self.config.heartbeat_every,
            system = ?self.config.system_every,
            database = ?self.config.database_every,
            detailed = ?self.config.detailed_every,
            "Starting scheduled status logging"
        );

        let this = &self;
        vec![
            spawn_periodic("heartbeat", this.config.heartbeat_every, cancel.clone(), {
                let this = Arc::clone(this);
                move || {
                    this.log_heartbeat();
                    std::future::ready(())
                }
            }),
            spawn_periodic("system", this.config.system_every, cancel.clone(), {
                let this = Arc::clone(this);
                move || {
                    this.log_system();
                    std::future::ready(())
                }
            }),
            spawn_periodic("database", this.config.database_every, cancel.clone(), {
                let this = Arc::clone(this);
                move || {
                    let this = Arc::clone(&this);
                    async move {
                        this.log_database().await;
                    }
                }
            }),
            spawn_periodic("detailed", this.config.detailed_every, cancel.clone(), {
                let this = Arc::clone(this);
                move || {
                    this.log_detailed();
                    std::future::ready(())
                }
            }),
        ]
    }

    /// Log one heartbeat line and return its sequence number.
    pub fn log_heartbeat(&self) -> u64 {
        let count = self.heartbeats.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            heartbeat = count,
            timestamp = %Utc::now().to_rfc3339(),
            active_workers = self.workers.active(),
            max_workers = self.workers.max(),
            "Heartbeat"
        );
        count
    }

    pub fn log_system(&self) {
        let snap = self.probe.snapshot();
        info!(
            used_mb = snap.used_memory_mb,
            total_mb = snap.total_memory_mb,
            available_mb = snap.available_memory_mb,
            process_mb = snap.process_memory_mb,
            threads = ?snap.process_threads,
            "System status"
        );
    }

    /// Log the entity count. Returns it, or `None` when the query failed.
    pub async fn log_database(&self) -> Option<u64> {
        match self.core.entities().count().await {
            Ok(count) => {
                info!(entity_count = count, "Database status");
                Some(count)
            }
            Err(e) => {
                error!(error = %e, "Database status check failed");
                None
            }
        }
    }

    pub fn log_detailed(&self) {
        let snap = self.probe.snapshot();
        info!("==================== DETAILED STATUS ====================");
        info!(service = %self.config.service_name, "Service");
        info!(uptime_ms = snap.uptime_ms, "Uptime");
        info!(runtime = "rust/tokio", version = env!("CARGO_PKG_VERSION"), "Runtime");
        info!(os = %snap.os_name, version = %snap.os_version, arch = snap.arch, "Operating system");
        info!(cpus = snap.cpu_count, "Available processors");
        info!("=========================================================");
    }
}

/// Run `job` on every tick of `every` until `cancel` fires.
fn spawn_periodic<F, Fut>(
    name: &'static str,
    every: Duration,
    cancel: CancellationToken,
    mut job: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => job().await,
                () = cancel.cancelled() => {
                    debug!(job = name, "Status job cancelled");
                    break;
                }
            }
        }
    })
}
