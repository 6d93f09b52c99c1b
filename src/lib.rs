//! feedstore - single-slot persistent cache for an ordered feed.
//!
//! This library crate exposes the [`FeedStore`] and re-exports the domain
//! and persistence types callers need alongside it.

pub mod store;

pub use feedstore_core::{
    CacheLookup, CachedFeed, Error, FeedImage, FeedImageId, Result, StoreConfig,
};
pub use feedstore_db::{CacheRecord, FeedImageRecord, SqliteEngine, StorageEngine};
pub use store::{Completion, DeleteResult, FeedStore, InsertResult, RetrieveResult};
