//! Composition utilities for building `AppCore` with `SQLite` backends.
//!
//! This module provides factory functions for wiring up the application
//! with `SQLite` repositories. It is focused purely on construction and
//! should not contain any domain logic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use faultbox_core::services::AppCore;
use faultbox_core::{Repos, RepositoryError};

use crate::repositories::{SqliteEntityRepository, SqliteLifecycleRepository};

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Build all `SQLite` repositories from a pool.
    ///
    /// Returns a `Repos` struct from `faultbox-core` containing
    /// trait-object-wrapped repositories.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteEntityRepository::new(pool.clone())),
            Arc::new(SqliteLifecycleRepository::new(pool)),
        )
    }

    /// Build a complete `AppCore` instance from a pool.
    ///
    /// Equivalent to:
    ///
    /// ```ignore
    /// let repos = CoreFactory::build_repos(pool);
    /// let core = AppCore::new(repos, started_at);
    /// ```
    pub fn build_app_core(pool: SqlitePool, started_at: DateTime<Utc>) -> AppCore {
        AppCore::new(Self::build_repos(pool), started_at)
    }

    /// Round-trip a trivial query, for health checks.
    pub async fn ping(pool: &SqlitePool) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;
    use faultbox_core::NewEntity;

    #[tokio::test]
    async fn test_build_app_core_end_to_end() {
        let pool = setup_test_database().await.unwrap();
        let core = CoreFactory::build_app_core(pool.clone(), Utc::now());

        let created = core
            .entities()
            .create(NewEntity::new("wired", None))
            .await
            .unwrap();
        assert_eq!(core.entities().count().await.unwrap(), 1);
        assert_eq!(
            core.entities().get_by_id(created.id).await.unwrap(),
            Some(created)
        );

        assert_eq!(core.restarts().mark_ready().await, 1);
    }

    #[tokio::test]
    async fn test_ping_fails_on_closed_pool() {
        let pool = setup_test_database().await.unwrap();
        CoreFactory::ping(&pool).await.unwrap();

        pool.close().await;
        assert!(CoreFactory::ping(&pool).await.is_err());
    }
}
