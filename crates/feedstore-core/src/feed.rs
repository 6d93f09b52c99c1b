//! Feed domain values.
//!
//! These are the shapes callers hand to and receive from the store. They
//! carry no persistence detail; the database crate maps them to records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ids::FeedImageId;

/// One item of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedImage {
    pub id: FeedImageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    /// Create an image with only the required fields set.
    pub fn new(id: FeedImageId, url: Url) -> Self {
        Self {
            id,
            description: None,
            location: None,
            url,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// The snapshot held by the store: an ordered feed plus the instant it was
/// cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFeed {
    pub feed: Vec<FeedImage>,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a successful cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Nothing has been cached, or the cache was deleted.
    Empty,
    /// The current snapshot.
    Found(CachedFeed),
}

impl CacheLookup {
    pub fn is_empty(&self) -> bool {
        matches!(self, CacheLookup::Empty)
    }

    /// Consume the lookup, returning the snapshot if one was found.
    pub fn into_cached(self) -> Option<CachedFeed> {
        match self {
            CacheLookup::Empty => None,
            CacheLookup::Found(cached) => Some(cached),
        }
    }
}

impl From<Option<CachedFeed>> for CacheLookup {
    fn from(cached: Option<CachedFeed>) -> Self {
        cached.map_or(CacheLookup::Empty, CacheLookup::Found)
    }
}
