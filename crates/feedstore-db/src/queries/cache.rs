//! Feed cache operations.
//!
//! These are plain statements over a connection; transaction boundaries are
//! the caller's concern.

use feedstore_core::{Error, Result};
use rusqlite::Connection;

use crate::models::{parse_timestamp, timestamp_parts, CacheRecord, FeedImageRecord};

/// Primary key of the only row `feed_cache` may hold.
const CACHE_SLOT: i64 = 1;

const IMAGE_COLS: &str = "id, description, location, url";

/// Column values that cannot be parsed mean the stored snapshot is corrupt;
/// anything else is a database failure.
fn read_error(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => Error::corrupt(e.to_string()),
        e => Error::database(e),
    }
}

/// Load the current snapshot with its images in stored order.
pub fn find_cache(conn: &Connection) -> Result<Option<CacheRecord>> {
    let result = conn.query_row(
        "SELECT timestamp_secs, timestamp_nanos FROM feed_cache WHERE id = ?1",
        [CACHE_SLOT],
        |row| parse_timestamp(row, 0),
    );
    let timestamp = match result {
        Ok(t) => t,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(read_error(e)),
    };

    let q = format!("SELECT {IMAGE_COLS} FROM feed_images WHERE cache_id = ?1 ORDER BY position");
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let images = stmt
        .query_map([CACHE_SLOT], FeedImageRecord::from_row)
        .map_err(Error::database)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(read_error)?;

    Ok(Some(CacheRecord { timestamp, images }))
}

/// Write `record` into the empty cache slot.
///
/// Fails if a snapshot is already present; callers replacing the cache must
/// call [`delete_cache`] first.
pub fn insert_cache(conn: &Connection, record: &CacheRecord) -> Result<()> {
    let (secs, nanos) = timestamp_parts(&record.timestamp);
    conn.execute(
        "INSERT INTO feed_cache (id, timestamp_secs, timestamp_nanos) VALUES (?1, ?2, ?3)",
        rusqlite::params![CACHE_SLOT, secs, nanos],
    )
    .map_err(Error::database)?;

    let mut stmt = conn
        .prepare(
            "INSERT INTO feed_images (cache_id, position, id, description, location, url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(Error::database)?;

    for (position, image) in record.images.iter().enumerate() {
        stmt.execute(rusqlite::params![
            CACHE_SLOT,
            position as i64,
            image.id.to_string(),
            image.description,
            image.location,
            image.url.as_str(),
        ])
        .map_err(Error::database)?;
    }

    Ok(())
}

/// Delete the snapshot and, by cascade, its images.
///
/// Returns `true` if a snapshot was removed.
pub fn delete_cache(conn: &Connection) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM feed_cache WHERE id = ?1", [CACHE_SLOT])
        .map_err(Error::database)?;
    Ok(n > 0)
}
