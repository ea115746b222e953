//! `SQLite` implementation of the `LifecycleRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use faultbox_core::{LifecycleRepository, RepositoryError, StartRecord};

use super::row_mappers::{format_datetime, storage_err};

const START_RECORD_KEY: &str = "start_record";

/// `SQLite` implementation of the `LifecycleRepository` trait.
///
/// Stores the start record as a JSON blob in the `app_state` key-value table.
pub struct SqliteLifecycleRepository {
    pool: SqlitePool,
}

impl SqliteLifecycleRepository {
    /// Create a new `SQLite` lifecycle repository.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn decode(json: &str) -> Result<StartRecord, RepositoryError> {
    serde_json::from_str(json).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

#[async_trait]
impl LifecycleRepository for SqliteLifecycleRepository {
    async fn record_start(&self, at: DateTime<Utc>) -> Result<StartRecord, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let row = sqlx::query("SELECT value FROM app_state WHERE key = ?")
            .bind(START_RECORD_KEY)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_err)?;

        let previous = match row {
            Some(r) => {
                let json: String = r.get("value");
                decode(&json)?.start_count
            }
            None => 0,
        };

        let record = StartRecord {
            start_count: previous + 1,
            last_started_at: at,
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        sqlx::query("INSERT OR REPLACE INTO app_state (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(START_RECORD_KEY)
            .bind(&json)
            .bind(format_datetime(&at))
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::{setup_database, setup_test_database};

    async fn stored_record(pool: &SqlitePool) -> Option<StartRecord> {
        let row = sqlx::query("SELECT value FROM app_state WHERE key = ?")
            .bind(START_RECORD_KEY)
            .fetch_optional(pool)
            .await
            .unwrap();
        row.map(|r| decode(&r.get::<String, _>("value")).unwrap())
    }

    #[tokio::test]
    async fn test_record_start_increments() {
        let pool = setup_test_database().await.unwrap();
        let repo = SqliteLifecycleRepository::new(pool.clone());
        assert!(stored_record(&pool).await.is_none());

        let first = repo.record_start(Utc::now()).await.unwrap();
        let second = repo.record_start(Utc::now()).await.unwrap();

        assert_eq!(first.start_count, 1);
        assert_eq!(second.start_count, 2);
        assert_eq!(stored_record(&pool).await, Some(second));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_serialization_error() {
        let pool = setup_test_database().await.unwrap();
        sqlx::query("INSERT INTO app_state (key, value, updated_at) VALUES (?, 'not json', ?)")
            .bind(START_RECORD_KEY)
            .bind(format_datetime(&Utc::now()))
            .execute(&pool)
            .await
            .unwrap();

        let err = SqliteLifecycleRepository::new(pool)
            .record_start(Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_count_survives_reopen_of_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("state.db").display());

        let pool = setup_database(&url).await.unwrap();
        SqliteLifecycleRepository::new(pool.clone())
            .record_start(Utc::now())
            .await
            .unwrap();
        pool.close().await;

        let pool = setup_database(&url).await.unwrap();
        let record = SqliteLifecycleRepository::new(pool)
            .record_start(Utc::now())
            .await
            .unwrap();
        assert_eq!(record.start_count, 2);
    }
}
