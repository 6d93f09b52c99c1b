//! Persisted record types and their mapping to domain values.
//!
//! Each record implements `from_row` for constructing itself from a
//! `rusqlite::Row`. Columns that fail to parse are reported as
//! `FromSqlConversionFailure` so callers can tell corruption apart from
//! an I/O failure.

use chrono::{DateTime, Utc};
use feedstore_core::{CachedFeed, FeedImage, FeedImageId};
use rusqlite::types::Type;
use url::Url;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

fn conversion_failure(
    idx: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| conversion_failure(idx, e))?;
    Ok(T::from(uuid))
}

fn parse_url(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Url> {
    let s: String = row.get(idx)?;
    Url::parse(&s).map_err(|e| conversion_failure(idx, e))
}

/// Rebuild a timestamp from the seconds column at `idx` and the nanoseconds
/// column right after it.
pub(crate) fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    let nanos: u32 = row.get(idx + 1)?;
    DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {secs}s {nanos}ns").into(),
        )
    })
}

/// Split a timestamp into the `(seconds, nanoseconds)` pair `parse_timestamp`
/// reads back.
pub(crate) fn timestamp_parts(timestamp: &DateTime<Utc>) -> (i64, u32) {
    (timestamp.timestamp(), timestamp.timestamp_subsec_nanos())
}

// ---------------------------------------------------------------------------
// FeedImageRecord
// ---------------------------------------------------------------------------

/// One persisted feed image. Only ever stored as part of a [`CacheRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedImageRecord {
    pub id: FeedImageId,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImageRecord {
    /// Expects the columns `id, description, location, url` in that order.
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            description: row.get(1)?,
            location: row.get(2)?,
            url: parse_url(row, 3)?,
        })
    }

    pub fn into_local(self) -> FeedImage {
        FeedImage {
            id: self.id,
            description: self.description,
            location: self.location,
            url: self.url,
        }
    }
}

impl From<FeedImage> for FeedImageRecord {
    fn from(image: FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description,
            location: image.location,
            url: image.url,
        }
    }
}

// ---------------------------------------------------------------------------
// CacheRecord
// ---------------------------------------------------------------------------

/// The single persisted snapshot. Owns its images in feed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub timestamp: DateTime<Utc>,
    pub images: Vec<FeedImageRecord>,
}

impl CacheRecord {
    pub fn new(feed: Vec<FeedImage>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            images: feed.into_iter().map(FeedImageRecord::from).collect(),
        }
    }

    pub fn into_cached_feed(self) -> CachedFeed {
        CachedFeed {
            feed: self
                .images
                .into_iter()
                .map(FeedImageRecord::into_local)
                .collect(),
            timestamp: self.timestamp,
        }
    }
}
