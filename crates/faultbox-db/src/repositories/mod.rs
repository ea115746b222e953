//! Repository implementations using `SQLite`.
//!
//! These implementations encapsulate all SQL queries and database access.
//! The `SqlitePool` is confined to this module and never exposed through
//! the port trait signatures.

mod row_mappers;
mod sqlite_entity_repository;
mod sqlite_lifecycle_repository;

pub use sqlite_entity_repository::SqliteEntityRepository;
pub use sqlite_lifecycle_repository::SqliteLifecycleRepository;
