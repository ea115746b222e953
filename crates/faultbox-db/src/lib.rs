#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

// Re-export factory for convenient access
pub use factory::CoreFactory;

// Re-export repository implementations
pub use repositories::{SqliteEntityRepository, SqliteLifecycleRepository};

// Pool type handed to adapters for health checks
pub use sqlx::SqlitePool;

// Re-export setup functions for convenient access
pub use setup::{IN_MEMORY_URL, setup_database};
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;

// Linked for the bundled SQLite build only
use libsqlite3_sys as _;
