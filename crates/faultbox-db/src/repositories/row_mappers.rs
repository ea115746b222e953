//! Row mapping helpers for `SQLite` queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use faultbox_core::{Entity, RepositoryError};
use sqlx::Row;

/// Shared SELECT column list for entity queries.
pub const ENTITY_SELECT_COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Wrap a storage-layer error.
pub fn storage_err(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

/// Format a timestamp the way it is stored.
pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.to_rfc3339()
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and the `SQLite` `datetime('now')` format.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let trimmed = s.trim_end_matches(" UTC");
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
        .ok()
}

/// Parse a database row into an Entity.
pub fn row_to_entity(row: &sqlx::sqlite::SqliteRow) -> Result<Entity, RepositoryError> {
    let created_at: String = row.try_get("created_at").map_err(storage_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(storage_err)?;

    let created_at = parse_datetime(&created_at)
        .ok_or_else(|| RepositoryError::Serialization(format!("bad created_at: {created_at}")))?;
    let updated_at = parse_datetime(&updated_at)
        .ok_or_else(|| RepositoryError::Serialization(format!("bad updated_at: {updated_at}")))?;

    Ok(Entity {
        id: row.try_get("id").map_err(storage_err)?,
        name: row.try_get("name").map_err(storage_err)?,
        description: row.try_get("description").map_err(storage_err)?,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2024-01-02T03:04:05Z").is_some());
        assert!(parse_datetime("2024-01-02T03:04:05.123+09:00").is_some());
        assert!(parse_datetime("2024-01-02 03:04:05").is_some());
        assert!(parse_datetime("2024-01-02 03:04:05.5 UTC").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }
}
