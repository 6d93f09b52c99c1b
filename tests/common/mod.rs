//! Shared helpers for feed store integration tests.
//!
//! Provides feed builders and wrapper engines that inject latency or
//! failures around a real [`SqliteEngine`].

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use feedstore::{
    CacheRecord, Error, FeedImage, FeedImageId, Result, SqliteEngine, StorageEngine,
};
use url::Url;

/// A feed image with every field populated.
pub fn image(n: u32) -> FeedImage {
    FeedImage::new(
        FeedImageId::new(),
        Url::parse(&format!("https://images.example/{n}.jpg")).unwrap(),
    )
    .with_description(format!("description {n}"))
    .with_location(format!("location {n}"))
}

/// A feed image with only the required fields.
pub fn bare_image(n: u32) -> FeedImage {
    FeedImage::new(
        FeedImageId::new(),
        Url::parse(&format!("https://images.example/bare/{n}")).unwrap(),
    )
}

pub fn feed(range: std::ops::RangeInclusive<u32>) -> Vec<FeedImage> {
    range.map(image).collect()
}

/// A fixed timestamp, offset by `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 11, 9, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

pub fn memory_engine() -> SqliteEngine {
    SqliteEngine::open_in_memory("FeedStore").unwrap()
}

/// Switches shared between a test and the engine it handed to a store.
#[derive(Clone, Default)]
pub struct Faults {
    fail_write: Arc<AtomicBool>,
    fail_read: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    fail_commit: Arc<AtomicBool>,
    fail_abort: Arc<AtomicBool>,
}

impl Faults {
    pub fn fail_write(&self, on: bool) {
        self.fail_write.store(on, Ordering::SeqCst);
    }

    pub fn fail_read(&self, on: bool) {
        self.fail_read.store(on, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, on: bool) {
        self.fail_delete.store(on, Ordering::SeqCst);
    }

    pub fn fail_commit(&self, on: bool) {
        self.fail_commit.store(on, Ordering::SeqCst);
    }

    pub fn fail_abort(&self, on: bool) {
        self.fail_abort.store(on, Ordering::SeqCst);
    }
}

/// Wraps an engine, failing selected operations on demand.
///
/// A failing write still lets the inner engine apply the write first, so
/// the store has real partial changes to roll back. A failing commit leaves
/// the inner transaction open for the same reason.
pub struct FaultyEngine<E> {
    inner: E,
    faults: Faults,
}

impl<E: StorageEngine> FaultyEngine<E> {
    pub fn new(inner: E) -> (Self, Faults) {
        let faults = Faults::default();
        (
            Self {
                inner,
                faults: faults.clone(),
            },
            faults,
        )
    }
}

impl<E: StorageEngine> StorageEngine for FaultyEngine<E> {
    fn begin(&mut self) -> Result<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> Result<()> {
        if self.faults.fail_commit.load(Ordering::SeqCst) {
            return Err(Error::database("injected commit failure"));
        }
        self.inner.commit()
    }

    fn abort(&mut self) -> Result<()> {
        if self.faults.fail_abort.load(Ordering::SeqCst) {
            return Err(Error::database("injected abort failure"));
        }
        self.inner.abort()
    }

    fn read_cache(&mut self) -> Result<Option<CacheRecord>> {
        if self.faults.fail_read.load(Ordering::SeqCst) {
            return Err(Error::database("injected read failure"));
        }
        self.inner.read_cache()
    }

    fn write_cache(&mut self, record: &CacheRecord) -> Result<()> {
        self.inner.write_cache(record)?;
        if self.faults.fail_write.load(Ordering::SeqCst) {
            return Err(Error::database("injected write failure"));
        }
        Ok(())
    }

    fn delete_cache(&mut self) -> Result<bool> {
        if self.faults.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::database("injected delete failure"));
        }
        self.inner.delete_cache()
    }
}

/// Wraps an engine, sleeping before every write.
pub struct SlowEngine<E> {
    inner: E,
    delay: Duration,
}

impl<E: StorageEngine> SlowEngine<E> {
    pub fn new(inner: E, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

impl<E: StorageEngine> StorageEngine for SlowEngine<E> {
    fn begin(&mut self) -> Result<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> Result<()> {
        self.inner.commit()
    }

    fn abort(&mut self) -> Result<()> {
        self.inner.abort()
    }

    fn read_cache(&mut self) -> Result<Option<CacheRecord>> {
        self.inner.read_cache()
    }

    fn write_cache(&mut self, record: &CacheRecord) -> Result<()> {
        std::thread::sleep(self.delay);
        self.inner.write_cache(record)
    }

    fn delete_cache(&mut self) -> Result<bool> {
        std::thread::sleep(self.delay);
        self.inner.delete_cache()
    }
}
