#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    Entity, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, NewEntity, RestartInfo, StartRecord, format_uptime,
};
pub use ports::{CoreError, EntityRepository, LifecycleRepository, Repos, RepositoryError};
pub use services::{AppCore, EntityService, RestartMonitor};

// Silence unused dev-dependency warnings
#[cfg(test)]
use serde_json as _;
