//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, bail};
use axum::http::HeaderValue;
use chrono::Utc;
use faultbox_core::AppCore;
use faultbox_db::{CoreFactory, IN_MEMORY_URL, SqlitePool, setup_database};
use faultbox_runtime::{FanOut, LockBoard, StatusLogConfig, StatusLogger, SystemProbe, WorkerPool};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Prefix of request worker names, e.g. `http-worker-1`.
pub const WORKER_PREFIX: &str = "http-worker";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server. `0` picks a free port.
    pub port: u16,
    /// Address to bind.
    pub bind_address: IpAddr,
    /// `sqlite::memory:` or `sqlite://path/to/file.db`.
    pub database_url: String,
    /// Size of the request worker pool.
    pub max_workers: usize,
    /// Whether the periodic status jobs run.
    pub scheduled_logging: bool,
    /// Reported by the health and info endpoints and the status log.
    pub service_name: String,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ServerConfig {
    /// Port 8080 on all interfaces, in-memory database, five workers.
    pub fn with_defaults() -> Self {
        Self {
            port: 8080,
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            database_url: IN_MEMORY_URL.to_string(),
            max_workers: 5,
            scheduled_logging: true,
            service_name: "faultbox".to_string(),
            cors: CorsConfig::default(),
        }
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            bail!("max_workers must be at least 1");
        }
        if self.service_name.trim().is_empty() {
            bail!("service_name must not be blank");
        }
        if let CorsConfig::AllowOrigins(origins) = &self.cors {
            for origin in origins {
                if origin.trim().is_empty() || HeaderValue::from_str(origin).is_err() {
                    bail!("invalid CORS origin: {origin:?}");
                }
            }
        }
        Ok(())
    }

    /// Base URL the server can reach itself on.
    ///
    /// Unspecified bind addresses map to the loopback of the same family.
    pub fn loopback_url(&self) -> String {
        let host = match self.bind_address {
            IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            ip => ip,
        };
        format!("http://{}", SocketAddr::new(host, self.port))
    }

    fn status_log_config(&self) -> StatusLogConfig {
        StatusLogConfig {
            enabled: self.scheduled_logging,
            service_name: self.service_name.clone(),
            ..StatusLogConfig::default()
        }
    }
}

/// Application context for the Axum adapter.
///
/// Holds all initialized services for the web server.
pub struct AxumContext {
    /// The core application facade.
    pub core: Arc<AppCore>,
    /// Database pool, kept for health checks.
    pub pool: SqlitePool,
    /// Request worker pool every request leases from.
    pub workers: Arc<WorkerPool>,
    /// Lock the blocking scenario contends on.
    pub lockboard: Arc<LockBoard>,
    /// Loopback client for the blocking fan-out.
    pub fanout: FanOut,
    pub probe: Arc<SystemProbe>,
    pub status_log: Arc<StatusLogger>,
    /// Fires on shutdown; scenarios and status jobs stop on it.
    pub cancel: CancellationToken,
    pub config: ServerConfig,
}

/// Bootstrap the Axum server with all services.
///
/// Does not mark the application ready or start the status jobs;
/// [`start_server`] does that once the listener is bound.
pub async fn bootstrap(config: ServerConfig) -> Result<AxumContext> {
    config.validate()?;

    info!(
        database_url = %config.database_url,
        max_workers = config.max_workers,
        scheduled_logging = config.scheduled_logging,
        "Bootstrapping faultbox"
    );

    // 1. Database pool with schema
    let pool = setup_database(&config.database_url).await?;

    // 2. Core facade
    let core = Arc::new(CoreFactory::build_app_core(pool.clone(), Utc::now()));

    // 3. Runtime pieces
    let workers = Arc::new(WorkerPool::new(config.max_workers, WORKER_PREFIX));
    let lockboard = Arc::new(LockBoard::new());
    let fanout = FanOut::new(config.loopback_url())?;
    let probe = Arc::new(SystemProbe::new());

    // 4. Status logger
    let status_log = Arc::new(StatusLogger::new(
        Arc::clone(&core),
        Arc::clone(&workers),
        Arc::clone(&probe),
        config.status_log_config(),
    ));

    Ok(AxumContext {
        core,
        pool,
        workers,
        lockboard,
        fanout,
        probe,
        status_log,
        cancel: CancellationToken::new(),
        config,
    })
}

/// Bind, bootstrap and serve until Ctrl-C or SIGTERM.
pub async fn start_server(mut config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind(SocketAddr::new(config.bind_address, config.port)).await?;
    let local_addr = listener.local_addr()?;
    config.port = local_addr.port();

    let cors = config.cors.clone();
    let ctx = bootstrap(config).await?;
    let cancel = ctx.cancel.clone();

    let restart_count = ctx.core.restarts().mark_ready().await;
    let status_jobs = Arc::clone(&ctx.status_log).spawn(&cancel);

    info!(
        addr = %local_addr,
        restart_count,
        service = %ctx.config.service_name,
        "faultbox listening on http://{}",
        local_addr
    );

    let app = crate::routes::create_router(ctx, &cors);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    for job in status_jobs {
        if let Err(e) = job.await {
            warn!(error = %e, "Status job ended abnormally");
        }
    }

    info!("faultbox stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM, then cancel `cancel` so in-flight
/// scenarios release their workers and the server can drain.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
        () = cancel.cancelled() => {}
    }

    cancel.cancel();
}
