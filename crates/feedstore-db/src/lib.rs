//! feedstore-db: persistence layer for the feed cache.
//!
//! This crate provides the persisted record types, the embedded schema
//! models and their migrations, the [`StorageEngine`] capability trait,
//! and its SQLite implementation.

pub mod engine;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod sqlite;

pub use engine::StorageEngine;
pub use models::{CacheRecord, FeedImageRecord};
pub use sqlite::SqliteEngine;
