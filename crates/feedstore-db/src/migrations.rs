//! Embedded schema models and their migration runner.
//!
//! A [`SchemaModel`] is a named, ordered list of SQL migrations. Stores are
//! opened against a model by name; the runner applies whatever versions are
//! missing and tracks them in a `schema_migrations` table.

use feedstore_core::{Error, Result};
use rusqlite::Connection;

/// V1: the single cache slot and its ordered images.
///
/// `feed_cache.id` can only ever be 1, so the table holds at most one
/// snapshot. Its timestamp is whole seconds since the Unix epoch plus the
/// sub-second nanoseconds, so any `DateTime<Utc>` fits. Images hang off it
/// with `ON DELETE CASCADE` and are keyed by their position, which allows
/// the same image id to appear twice.
const V1_FEED_CACHE: &str = r#"
CREATE TABLE feed_cache (
    id              INTEGER PRIMARY KEY CHECK (id = 1),
    timestamp_secs  INTEGER NOT NULL,
    timestamp_nanos INTEGER NOT NULL
);

CREATE TABLE feed_images (
    cache_id    INTEGER NOT NULL REFERENCES feed_cache(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    id          TEXT NOT NULL,
    description TEXT,
    location    TEXT,
    url         TEXT NOT NULL,
    PRIMARY KEY (cache_id, position)
);
"#;

/// A named set of migrations describing one database layout.
#[derive(Debug)]
pub struct SchemaModel {
    pub name: &'static str,
    /// Ordered list of (version, sql) pairs.
    pub migrations: &'static [(i64, &'static str)],
}

impl SchemaModel {
    /// Highest version this model knows about.
    pub fn latest_version(&self) -> i64 {
        self.migrations.last().map_or(0, |&(version, _)| version)
    }
}

/// Every model shipped with this build.
pub const MODELS: &[SchemaModel] = &[SchemaModel {
    name: feedstore_core::config::DEFAULT_MODEL,
    migrations: &[(1, V1_FEED_CACHE)],
}];

/// Look up a shipped model by name.
pub fn resolve_model(name: &str) -> Result<&'static SchemaModel> {
    MODELS
        .iter()
        .find(|model| model.name == name)
        .ok_or_else(|| Error::model_not_found(name))
}

/// Highest applied migration version, or 0 for a fresh database.
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(Error::database)
}

/// Run all pending migrations of `model` on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// refuses databases written by a newer model, then applies each
/// outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection, model: &SchemaModel) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    let found = current_version(conn)?;
    let supported = model.latest_version();
    if found > supported {
        return Err(Error::SchemaMismatch { found, supported });
    }

    for &(version, sql) in model.migrations {
        if version <= found {
            continue;
        }

        let tx = conn.unchecked_transaction().map_err(Error::database)?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(Error::database)?;

        tx.commit().map_err(Error::database)?;

        tracing::debug!(model = model.name, version, "Applied migration");
    }

    Ok(())
}
