//! `SQLite` implementation of the `EntityRepository` trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use faultbox_core::{Entity, EntityRepository, NewEntity, RepositoryError};

use super::row_mappers::{ENTITY_SELECT_COLUMNS, format_datetime, row_to_entity, storage_err};

/// `SQLite` implementation of the `EntityRepository` trait.
pub struct SqliteEntityRepository {
    pool: SqlitePool,
}

impl SqliteEntityRepository {
    /// Create a new `SQLite` entity repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_where(
        &self,
        clause: &str,
        bind: Option<String>,
    ) -> Result<Vec<Entity>, RepositoryError> {
        let query = format!("SELECT {ENTITY_SELECT_COLUMNS} FROM entities {clause} ORDER BY id");
        let mut q = sqlx::query(&query);
        if let Some(value) = bind {
            q = q.bind(value);
        }
        let rows = q.fetch_all(&self.pool).await.map_err(storage_err)?;
        rows.iter().map(row_to_entity).collect()
    }
}

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Entity with ID {id}"))
}

#[async_trait]
impl EntityRepository for SqliteEntityRepository {
    async fn list(&self) -> Result<Vec<Entity>, RepositoryError> {
        self.fetch_where("", None).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Entity, RepositoryError> {
        let query = format!("SELECT {ENTITY_SELECT_COLUMNS} FROM entities WHERE id = ?");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| not_found(id))?;

        row_to_entity(&row)
    }

    async fn insert(&self, entity: &NewEntity) -> Result<Entity, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let query = format!(
            "INSERT INTO entities (name, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {ENTITY_SELECT_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(&entity.name)
            .bind(&entity.description)
            .bind(&now)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;

        row_to_entity(&row)
    }

    async fn update(&self, id: i64, entity: &NewEntity) -> Result<Entity, RepositoryError> {
        let query = format!(
            "UPDATE entities SET name = ?, description = ?, updated_at = ? \
             WHERE id = ? RETURNING {ENTITY_SELECT_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(&entity.name)
            .bind(&entity.description)
            .bind(format_datetime(&Utc::now()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| not_found(id))?;

        row_to_entity(&row)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM entities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool, RepositoryError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM entities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(found.is_some())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Entity>, RepositoryError> {
        // LIKE and lower() only fold ASCII, so match in Rust
        let needle = fragment.to_lowercase();
        let entities = self.fetch_where("", None).await?;
        Ok(entities
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn list_with_description(&self) -> Result<Vec<Entity>, RepositoryError> {
        self.fetch_where("WHERE description IS NOT NULL", None).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entities")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(count.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;

    async fn repo() -> SqliteEntityRepository {
        SqliteEntityRepository::new(setup_test_database().await.unwrap())
    }

    fn new_entity(name: &str, description: Option<&str>) -> NewEntity {
        NewEntity::new(name, description.map(str::to_string))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let saved = repo
            .insert(&new_entity("first", Some("hello")))
            .await
            .unwrap();

        assert!(saved.id > 0);
        assert_eq!(saved.created_at, saved.updated_at);

        let fetched = repo.get_by_id(saved.id).await.unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = repo().await.get_by_id(99).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_orders_by_id() {
        let repo = repo().await;
        for name in ["c", "a", "b"] {
            repo.insert(&new_entity(name, None)).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = repo().await;
        let saved = repo.insert(&new_entity("old", Some("d"))).await.unwrap();

        let updated = repo
            .update(saved.id, &new_entity("new", None))
            .await
            .unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.name, "new");
        assert_eq!(updated.description, None);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = repo()
            .await
            .update(5, &new_entity("x", None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let repo = repo().await;
        let saved = repo.insert(&new_entity("gone", None)).await.unwrap();

        assert!(repo.exists(saved.id).await.unwrap());
        repo.delete(saved.id).await.unwrap();
        assert!(!repo.exists(saved.id).await.unwrap());

        let err = repo.delete(saved.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let repo = repo().await;
        repo.insert(&new_entity("Test Entity", None)).await.unwrap();
        repo.insert(&new_entity("another TEST", None)).await.unwrap();
        repo.insert(&new_entity("unrelated", None)).await.unwrap();

        let found = repo.search_by_name("test").await.unwrap();
        assert_eq!(found.len(), 2);

        let all = repo.search_by_name("").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = repo().await;
        repo.insert(&new_entity("100% done", None)).await.unwrap();
        repo.insert(&new_entity("100 done", None)).await.unwrap();
        repo.insert(&new_entity("snake_case", None)).await.unwrap();
        repo.insert(&new_entity("snakeXcase", None)).await.unwrap();

        let found = repo.search_by_name("0%").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "100% done");

        let found = repo.search_by_name("e_c").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "snake_case");
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let repo = repo().await;
        repo.insert(&new_entity("Ärger Straße", None)).await.unwrap();
        repo.insert(&new_entity("ÉCOLE", None)).await.unwrap();
        repo.insert(&new_entity("arger", None)).await.unwrap();

        let found = repo.search_by_name("ärger").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ärger Straße");

        let found = repo.search_by_name("école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "ÉCOLE");
    }

    #[tokio::test]
    async fn test_list_with_description() {
        let repo = repo().await;
        repo.insert(&new_entity("a", Some("has one"))).await.unwrap();
        repo.insert(&new_entity("b", None)).await.unwrap();

        let found = repo.list_with_description().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "a");
    }
}
