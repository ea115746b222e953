//! Entity repository trait definition.
//!
//! This port defines the interface for entity persistence operations.
//! Implementations must handle all storage details internally.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Entity, NewEntity};

/// Repository for entity persistence operations.
///
/// Payloads reaching the repository are already validated by
/// `EntityService`.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// List all entities, ordered by ID.
    async fn list(&self) -> Result<Vec<Entity>, RepositoryError>;

    /// Get an entity by its database ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the entity doesn't exist.
    async fn get_by_id(&self, id: i64) -> Result<Entity, RepositoryError>;

    /// Insert a new entity and return it with its assigned ID.
    async fn insert(&self, entity: &NewEntity) -> Result<Entity, RepositoryError>;

    /// Replace the name and description of an existing entity.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the entity doesn't exist.
    async fn update(&self, id: i64, entity: &NewEntity) -> Result<Entity, RepositoryError>;

    /// Delete an entity by its database ID.
    ///
    /// Returns `Err(RepositoryError::NotFound)` if the entity doesn't exist.
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;

    /// Whether an entity with this ID exists.
    async fn exists(&self, id: i64) -> Result<bool, RepositoryError>;

    /// Entities whose name contains `fragment`, ignoring case.
    ///
    /// `%` and `_` in the fragment match literally.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Entity>, RepositoryError>;

    /// Entities that have a description.
    async fn list_with_description(&self) -> Result<Vec<Entity>, RepositoryError>;

    /// Total number of entities.
    async fn count(&self) -> Result<u64, RepositoryError>;
}
