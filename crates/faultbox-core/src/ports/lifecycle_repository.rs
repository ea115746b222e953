//! Lifecycle repository trait definition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::RepositoryError;
use crate::domain::StartRecord;

/// Repository for application start records.
///
/// With a file-backed database the start count survives process
/// restarts; with an in-memory database it resets with the process.
#[async_trait]
pub trait LifecycleRepository: Send + Sync {
    /// Record a start at `at`, returning the updated record.
    async fn record_start(&self, at: DateTime<Utc>) -> Result<StartRecord, RepositoryError>;
}
