//! In-memory port implementations for service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Entity, NewEntity, StartRecord};
use crate::ports::{EntityRepository, LifecycleRepository, RepositoryError};

#[derive(Default)]
pub struct MemoryEntityRepo {
    rows: Mutex<Vec<Entity>>,
    next_id: Mutex<i64>,
}

fn not_found(id: i64) -> RepositoryError {
    RepositoryError::NotFound(format!("Entity with ID {id}"))
}

#[async_trait]
impl EntityRepository for MemoryEntityRepo {
    async fn list(&self) -> Result<Vec<Entity>, RepositoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Entity, RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn insert(&self, entity: &NewEntity) -> Result<Entity, RepositoryError> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let now = Utc::now();
        let saved = Entity {
            id: *next_id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, id: i64, entity: &NewEntity) -> Result<Entity, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|e| e.id == id).ok_or_else(|| not_found(id))?;
        row.name = entity.name.clone();
        row.description = entity.description.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| e.id != id);
        if rows.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().any(|e| e.id == id))
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Entity>, RepositoryError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_with_description(&self) -> Result<Vec<Entity>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.description.is_some())
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct MemoryLifecycleRepo {
    record: Mutex<Option<StartRecord>>,
}

impl MemoryLifecycleRepo {
    pub fn with_count(start_count: u64) -> Self {
        Self {
            record: Mutex::new(Some(StartRecord {
                start_count,
                last_started_at: Utc::now(),
            })),
        }
    }
}

#[async_trait]
impl LifecycleRepository for MemoryLifecycleRepo {
    async fn record_start(&self, at: DateTime<Utc>) -> Result<StartRecord, RepositoryError> {
        let mut record = self.record.lock().unwrap();
        let start_count = record.map_or(0, |r| r.start_count) + 1;
        let updated = StartRecord {
            start_count,
            last_started_at: at,
        };
        *record = Some(updated);
        Ok(updated)
    }
}

/// Lifecycle repository whose every call fails.
pub struct FailingLifecycleRepo;

#[async_trait]
impl LifecycleRepository for FailingLifecycleRepo {
    async fn record_start(&self, _at: DateTime<Utc>) -> Result<StartRecord, RepositoryError> {
        Err(RepositoryError::Storage("disk on fire".to_string()))
    }
}
