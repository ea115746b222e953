//! Database setup and initialization.
//!
//! This module provides the `setup_database()` function for initializing
//! the `SQLite` database with full schema. Entry points call this with the
//! configured database URL.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// URL of the default, process-lifetime database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Sets up the `SQLite` connection pool and ensures the schema exists.
///
/// Accepts `sqlite::memory:` or a file URL such as `sqlite://data/faultbox.db`.
/// For files, the parent directory and the file are created if missing.
/// In-memory pools pin one connection open so the database outlives idle
/// connection reaping.
///
/// # Example
///
/// ```rust,no_run
/// use faultbox_db::setup_database;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database("sqlite://data/faultbox.db").await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(url: &str) -> Result<SqlitePool> {
    if !url.starts_with("sqlite:") {
        anyhow::bail!("unsupported database URL (expected sqlite:...): {url}");
    }

    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database URL: {url}"))?
        .create_if_missing(true);

    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    if !in_memory {
        // Ensure parent directory exists
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(10))
    };

    let pool = pool_options.connect_with(options).await?;

    create_schema(&pool).await?;

    tracing::info!(url, in_memory, "Database ready");
    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// Creates a fresh in-memory database with the full production schema.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    setup_database(IN_MEMORY_URL).await
}

/// Creates the complete database schema.
///
/// Safe to call multiple times as all operations use IF NOT EXISTS.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Index on name for LIKE searches
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entities_name ON entities(name)")
        .execute(pool)
        .await?;

    // Key-value application state (start records)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
