//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Traits are minimal and CRUD-focused for repositories

pub mod entity_repository;
pub mod lifecycle_repository;

use std::sync::Arc;
use thiserror::Error;

pub use entity_repository::EntityRepository;
pub use lifecycle_repository::LifecycleRepository;

/// Container for all repository trait objects.
///
/// Lives in `faultbox-core` so that `AppCore` can accept it without
/// depending on `faultbox-db`.
#[derive(Clone)]
pub struct Repos {
    /// Entity repository for CRUD and search.
    pub entities: Arc<dyn EntityRepository>,
    /// Lifecycle repository for start records.
    pub lifecycle: Arc<dyn LifecycleRepository>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(
        entities: Arc<dyn EntityRepository>,
        lifecycle: Arc<dyn LifecycleRepository>,
    ) -> Self {
        Self {
            entities,
            lifecycle,
        }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    /// Whether this error means the requested record does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound(_)))
    }
}
