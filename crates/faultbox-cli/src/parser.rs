//! Command-line and environment options.

use std::net::{IpAddr, Ipv4Addr};

use clap::{ArgAction, Parser};
use faultbox_axum::{CorsConfig, ServerConfig};

use crate::logging::LogFormat;

/// Kubernetes failure-injection target service.
///
/// Every option can also be set through its `FAULTBOX_*` environment
/// variable or a `.env` file.
#[derive(Debug, Parser)]
#[command(name = "faultbox")]
#[command(version, about)]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "FAULTBOX_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "FAULTBOX_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// `sqlite::memory:` or `sqlite://path/to/file.db`
    #[arg(long, env = "FAULTBOX_DATABASE_URL", default_value = "sqlite::memory:")]
    pub database_url: String,

    /// Request worker pool size
    #[arg(
        long,
        env = "FAULTBOX_MAX_WORKERS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub max_workers: u16,

    /// Run the periodic status log jobs
    #[arg(
        long,
        env = "FAULTBOX_SCHEDULED_LOGGING",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub scheduled_logging: bool,

    /// Service name reported by health, info and status logs
    #[arg(long, env = "FAULTBOX_SERVICE_NAME", default_value = "faultbox")]
    pub service_name: String,

    /// Allowed CORS origins; all origins when empty
    #[arg(long = "cors-origin", env = "FAULTBOX_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Log line format
    #[arg(long, env = "FAULTBOX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Enable debug output when `RUST_LOG` is unset
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve into the server configuration.
    pub fn server_config(&self) -> ServerConfig {
        let cors = if self.cors_origins.is_empty() {
            CorsConfig::AllowAll
        } else {
            CorsConfig::AllowOrigins(self.cors_origins.clone())
        };

        ServerConfig {
            port: self.port,
            bind_address: self.bind,
            database_url: self.database_url.clone(),
            max_workers: usize::from(self.max_workers),
            scheduled_logging: self.scheduled_logging,
            service_name: self.service_name.clone(),
            cors,
        }
    }
}
