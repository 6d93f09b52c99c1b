//! The feed store: a single-slot snapshot cache behind a serialized worker.
//!
//! Every [`FeedStore`] handle submits requests to one dedicated worker
//! thread that exclusively owns the [`StorageEngine`]. Requests are queued
//! at the moment the operation method is called and executed strictly in
//! that order, one at a time; the returned [`Completion`] only waits for
//! the answer.
//!
//! # Failure recovery
//!
//! An insert runs inside an engine transaction. If any step fails the
//! transaction is aborted, so the store keeps exactly the snapshot it had
//! before the insert was attempted.
//!
//! If the abort itself fails, the engine may still hold the half-applied
//! insert. The worker then reports the insert's own error, shuts down and
//! releases the engine; every queued and later operation resolves to
//! [`Error::StoreClosed`].
//!
//! A delete is a single engine call with no surrounding transaction. If it
//! fails, whatever the engine managed to apply stays applied. With the
//! SQLite engine the delete is one statement and therefore all-or-nothing,
//! but other engines may leave partial state; callers that need a known
//! state after a failed delete should retry it.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = FeedStore::open("feed.db", "FeedStore")?;
//! store.insert(feed, Utc::now()).await?;
//! match store.retrieve().await? {
//!     CacheLookup::Found(cached) => println!("{} images", cached.feed.len()),
//!     CacheLookup::Empty => println!("nothing cached"),
//! }
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use feedstore_core::{CacheLookup, Error, FeedImage, Result, StoreConfig};
use feedstore_db::{CacheRecord, SqliteEngine, StorageEngine};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Result of [`FeedStore::retrieve`].
pub type RetrieveResult = Result<CacheLookup>;

/// Result of [`FeedStore::insert`].
pub type InsertResult = Result<()>;

/// Result of [`FeedStore::delete_cached_feed`].
pub type DeleteResult = Result<()>;

enum Command {
    Retrieve {
        reply: oneshot::Sender<RetrieveResult>,
    },
    Insert {
        feed: Vec<FeedImage>,
        timestamp: DateTime<Utc>,
        reply: oneshot::Sender<InsertResult>,
    },
    Delete {
        reply: oneshot::Sender<DeleteResult>,
    },
}

/// Handle to a feed store.
///
/// Cloning is cheap; clones share the same worker and queue. The worker
/// exits and releases the backing store once every handle is dropped.
#[derive(Clone)]
pub struct FeedStore {
    sender: mpsc::UnboundedSender<Command>,
}

impl FeedStore {
    /// Open a SQLite-backed store at `path` using the named schema model.
    ///
    /// Fails with [`Error::ModelNotFound`] if `model` is unknown, or with the
    /// underlying database error if the file cannot be opened or created.
    pub fn open(path: impl Into<PathBuf>, model: &str) -> Result<Self> {
        Self::from_config(&StoreConfig {
            model: model.to_string(),
            ..StoreConfig::at(path)
        })
    }

    /// Open a SQLite-backed store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::with_engine(SqliteEngine::open(config)?)
    }

    /// Open a store over a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::from_config(&StoreConfig::at(":memory:"))
    }

    /// Start a store over any engine. The engine moves onto the worker
    /// thread and is not reachable from anywhere else afterwards.
    pub fn with_engine<E: StorageEngine>(engine: E) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("feed-store".into())
            .spawn(move || run_worker(engine, receiver))?;

        Ok(Self { sender })
    }

    /// Look up the current snapshot.
    pub fn retrieve(&self) -> Completion<CacheLookup> {
        self.submit(|reply| Command::Retrieve { reply })
    }

    /// Replace whatever is cached with `feed` labelled by `timestamp`.
    pub fn insert(&self, feed: Vec<FeedImage>, timestamp: DateTime<Utc>) -> Completion<()> {
        self.submit(|reply| Command::Insert {
            feed,
            timestamp,
            reply,
        })
    }

    /// Remove the cached snapshot. Succeeds when nothing is cached.
    pub fn delete_cached_feed(&self) -> Completion<()> {
        self.submit(|reply| Command::Delete { reply })
    }

    fn submit<T>(&self, command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Completion<T> {
        let (reply, receiver) = oneshot::channel();
        // On failure the command, and with it `reply`, is dropped, which
        // resolves the completion to `StoreClosed`.
        if self.sender.send(command(reply)).is_err() {
            warn!("Feed store worker is gone; request not submitted");
        }
        Completion { receiver }
    }
}

/// The pending answer to a submitted operation.
///
/// The operation is already queued when this is returned; dropping it does
/// not cancel the operation, only discards its result.
#[must_use = "the operation runs regardless, but its result is lost unless awaited"]
pub struct Completion<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> Future for Completion<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|answer| answer.unwrap_or(Err(Error::StoreClosed)))
    }
}

/// Whether the engine can keep serving commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Ready,
    /// A rollback failed; the engine's contents are unknown.
    Poisoned,
}

/// Worker loop: drains the command channel, running each command to
/// completion before taking the next. Stops early if the engine is poisoned,
/// dropping the receiver so pending and future commands see `StoreClosed`.
fn run_worker<E: StorageEngine>(mut engine: E, mut receiver: mpsc::UnboundedReceiver<Command>) {
    info!("Feed store worker started");

    while let Some(command) = receiver.blocking_recv() {
        let (delivered, state) = match command {
            Command::Retrieve { reply } => {
                (reply.send(retrieve(&mut engine)).is_ok(), EngineState::Ready)
            }
            Command::Insert {
                feed,
                timestamp,
                reply,
            } => {
                let (result, state) = insert(&mut engine, feed, timestamp);
                (reply.send(result).is_ok(), state)
            }
            Command::Delete { reply } => {
                (reply.send(delete(&mut engine)).is_ok(), EngineState::Ready)
            }
        };
        if !delivered {
            debug!("Caller stopped waiting; result discarded");
        }
        if state == EngineState::Poisoned {
            error!("Feed store engine is in an unknown state; closing the store");
            break;
        }
    }

    info!("Feed store worker stopped");
}

fn retrieve<E: StorageEngine>(engine: &mut E) -> RetrieveResult {
    match engine.read_cache() {
        Ok(record) => {
            let lookup = CacheLookup::from(record.map(CacheRecord::into_cached_feed));
            debug!(empty = lookup.is_empty(), "Retrieved cached feed");
            Ok(lookup)
        }
        Err(e) => {
            warn!(error = %e, "Failed to retrieve cached feed");
            Err(e)
        }
    }
}

fn insert<E: StorageEngine>(
    engine: &mut E,
    feed: Vec<FeedImage>,
    timestamp: DateTime<Utc>,
) -> (InsertResult, EngineState) {
    let images = feed.len();
    let record = CacheRecord::new(feed, timestamp);

    if let Err(e) = engine.begin() {
        warn!(error = %e, images, "Failed to start insert");
        return (Err(e), EngineState::Ready);
    }

    let result = match replace(engine, &record) {
        Ok(()) => engine.commit(),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            debug!(images, %timestamp, "Inserted cached feed");
            (Ok(()), EngineState::Ready)
        }
        Err(e) => {
            warn!(error = %e, images, "Insert failed; rolling back");
            match engine.abort() {
                Ok(()) => (Err(e), EngineState::Ready),
                Err(abort_err) => {
                    error!(error = %abort_err, "Rollback after failed insert also failed");
                    (Err(e), EngineState::Poisoned)
                }
            }
        }
    }
}

/// Empty the slot, then fill it. Removing first keeps the single-slot
/// invariant at every step of the transaction.
fn replace<E: StorageEngine>(engine: &mut E, record: &CacheRecord) -> Result<()> {
    engine.delete_cache()?;
    engine.write_cache(record)
}

fn delete<E: StorageEngine>(engine: &mut E) -> DeleteResult {
    match engine.delete_cache() {
        Ok(removed) => {
            debug!(removed, "Deleted cached feed");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Failed to delete cached feed");
            Err(e)
        }
    }
}
