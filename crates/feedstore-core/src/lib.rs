//! feedstore-core: shared domain values, IDs, errors, and configuration.
//!
//! This crate is the foundational dependency for the other feedstore
//! crates. It knows nothing about how a snapshot is persisted; it only
//! defines what a feed image and a cached feed are, and how failures are
//! reported.

pub mod config;
pub mod error;
pub mod feed;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use feed::{CacheLookup, CachedFeed, FeedImage};
pub use ids::*;
