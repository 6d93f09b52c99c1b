//! SQLite-backed [`StorageEngine`].

use std::path::Path;
use std::time::Duration;

use feedstore_core::{Error, Result, StoreConfig};
use rusqlite::Connection;

use crate::engine::StorageEngine;
use crate::migrations::{self, SchemaModel};
use crate::models::CacheRecord;
use crate::queries::cache;

/// A single exclusively-owned SQLite connection holding the cache slot.
pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    /// Open (creating if needed) the database described by `config`.
    ///
    /// The schema model is resolved before anything touches disk, so an
    /// unknown model always yields [`Error::ModelNotFound`]. File databases
    /// get WAL journaling; every connection enforces foreign keys so image
    /// rows cascade with their cache.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let model = migrations::resolve_model(&config.model)?;

        let conn = if config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.path)
        }
        .map_err(|e| {
            Error::database(format!(
                "Failed to open database at {}: {e}",
                config.path.display()
            ))
        })?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(Error::database)?;

        let pragmas = if config.is_in_memory() {
            "PRAGMA foreign_keys = ON;"
        } else {
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;"
        };
        conn.execute_batch(pragmas).map_err(Error::database)?;

        Self::with_connection(conn, model, &config.path)
    }

    /// Open a private in-memory database using the named model.
    pub fn open_in_memory(model: &str) -> Result<Self> {
        Self::open(&StoreConfig {
            model: model.to_string(),
            ..StoreConfig::at(":memory:")
        })
    }

    fn with_connection(conn: Connection, model: &SchemaModel, path: &Path) -> Result<Self> {
        migrations::run_migrations(&conn, model)?;
        tracing::info!(
            path = %path.display(),
            model = model.name,
            version = model.latest_version(),
            "Opened feed cache database"
        );
        Ok(Self { conn })
    }
}

impl StorageEngine for SqliteEngine {
    fn begin(&mut self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN IMMEDIATE")
            .map_err(Error::database)
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT").map_err(Error::database)
    }

    fn abort(&mut self) -> Result<()> {
        // SQLite may already have rolled back on its own (e.g. after SQLITE_FULL).
        if self.conn.is_autocommit() {
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK").map_err(Error::database)
    }

    fn read_cache(&mut self) -> Result<Option<CacheRecord>> {
        cache::find_cache(&self.conn)
    }

    fn write_cache(&mut self, record: &CacheRecord) -> Result<()> {
        cache::insert_cache(&self.conn, record)
    }

    fn delete_cache(&mut self) -> Result<bool> {
        cache::delete_cache(&self.conn)
    }
}
