//! Typed identifier for feed images.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a single feed image, assigned by the feed source.
///
/// Ids are not unique within a feed; the same image may appear twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedImageId(Uuid);

impl FeedImageId {
    /// Create a new random ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FeedImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FeedImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for FeedImageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for FeedImageId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<FeedImageId> for Uuid {
    fn from(id: FeedImageId) -> Self {
        id.0
    }
}
