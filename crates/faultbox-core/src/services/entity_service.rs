//! Entity service - orchestrates entity CRUD and search.

use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::domain::{Entity, NewEntity};
use crate::ports::{CoreError, EntityRepository, RepositoryError};

/// Service for entity operations.
///
/// Each operation runs inside its own named span so request traces show
/// the service call separately from the HTTP handler.
pub struct EntityService {
    repo: Arc<dyn EntityRepository>,
}

impl EntityService {
    /// Create a new entity service with the given repository.
    pub fn new(repo: Arc<dyn EntityRepository>) -> Self {
        Self { repo }
    }

    /// List all entities.
    pub async fn get_all(&self) -> Result<Vec<Entity>, CoreError> {
        async {
            debug!("Fetching all entities");
            let entities = self.repo.list().await?;
            info!(count = entities.len(), "Retrieved entities");
            Ok::<_, CoreError>(entities)
        }
        .instrument(info_span!("get-all-entities"))
        .await
    }

    /// Get an entity by ID, `None` if it doesn't exist.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Entity>, CoreError> {
        async {
            debug!(id, "Fetching entity");
            match self.repo.get_by_id(id).await {
                Ok(entity) => {
                    info!(id, name = %entity.name, "Found entity");
                    Ok(Some(entity))
                }
                Err(RepositoryError::NotFound(_)) => {
                    warn!(id, "Entity not found");
                    Ok(None)
                }
                Err(e) => Err(CoreError::from(e)),
            }
        }
        .instrument(info_span!("get-entity-by-id", id))
        .await
    }

    /// Create a new entity.
    pub async fn create(&self, entity: NewEntity) -> Result<Entity, CoreError> {
        async {
            let entity = entity.validate()?;
            debug!(name = %entity.name, "Creating new entity");
            let saved = self.repo.insert(&entity).await?;
            info!(id = saved.id, "Created entity");
            Ok::<_, CoreError>(saved)
        }
        .instrument(info_span!("create-entity"))
        .await
    }

    /// Replace name and description of an existing entity.
    pub async fn update(&self, id: i64, entity: NewEntity) -> Result<Entity, CoreError> {
        async {
            let entity = entity.validate()?;
            debug!(id, "Updating entity");
            match self.repo.update(id, &entity).await {
                Ok(saved) => {
                    info!(id, name = %saved.name, "Updated entity");
                    Ok(saved)
                }
                Err(e) => {
                    if matches!(e, RepositoryError::NotFound(_)) {
                        error!(id, "Entity not found for update");
                    }
                    Err(CoreError::from(e))
                }
            }
        }
        .instrument(info_span!("update-entity", id))
        .await
    }

    /// Delete an entity.
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        async {
            debug!(id, "Deleting entity");
            if !self.repo.exists(id).await? {
                warn!(id, "Entity not found for deletion");
                return Err(RepositoryError::NotFound(format!("Entity with ID {id}")).into());
            }
            self.repo.delete(id).await?;
            info!(id, "Deleted entity");
            Ok::<_, CoreError>(())
        }
        .instrument(info_span!("delete-entity", id))
        .await
    }

    /// Entities whose name contains `name`, ignoring case.
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<Entity>, CoreError> {
        async {
            debug!(name, "Searching entities by name");
            let entities = self.repo.search_by_name(name).await?;
            info!(count = entities.len(), name, "Found matching entities");
            Ok::<_, CoreError>(entities)
        }
        .instrument(info_span!("search-entities-by-name"))
        .await
    }

    /// Entities that carry a description.
    pub async fn with_description(&self) -> Result<Vec<Entity>, CoreError> {
        async {
            let entities = self.repo.list_with_description().await?;
            info!(count = entities.len(), "Retrieved entities with description");
            Ok::<_, CoreError>(entities)
        }
        .instrument(info_span!("entities-with-description"))
        .await
    }

    /// Total number of entities.
    pub async fn count(&self) -> Result<u64, CoreError> {
        self.repo.count().await.map_err(CoreError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryEntityRepo;

    fn service() -> EntityService {
        EntityService::new(Arc::new(MemoryEntityRepo::default()))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let svc = service();
        let created = svc
            .create(NewEntity::new(" first ", Some("desc".to_string())))
            .await
            .unwrap();

        assert_eq!(created.name, "first");
        let fetched = svc.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let err = service().create(NewEntity::new("", None)).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        assert!(service().get_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = service()
            .update(7, NewEntity::new("x", None))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_replaces_description() {
        let svc = service();
        let created = svc
            .create(NewEntity::new("a", Some("old".to_string())))
            .await
            .unwrap();

        let updated = svc
            .update(created.id, NewEntity::new("b", None))
            .await
            .unwrap();
        assert_eq!(updated.name, "b");
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let err = service().delete(3).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_entity() {
        let svc = service();
        let created = svc.create(NewEntity::new("a", None)).await.unwrap();
        svc.delete(created.id).await.unwrap();
        assert!(svc.get_by_id(created.id).await.unwrap().is_none());
        assert_eq!(svc.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_and_with_description() {
        let svc = service();
        svc.create(NewEntity::new("Alpha", Some("x".to_string())))
            .await
            .unwrap();
        svc.create(NewEntity::new("beta", None)).await.unwrap();

        let found = svc.search_by_name("ALP").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alpha");

        assert_eq!(svc.search_by_name("").await.unwrap().len(), 2);
        assert_eq!(svc.with_description().await.unwrap().len(), 1);
    }
}
