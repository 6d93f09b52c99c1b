//! Storage engine capability trait.

use feedstore_core::Result;

use crate::models::CacheRecord;

/// Record-level access to the backing store that holds the cache slot.
///
/// An engine is owned by exactly one feed store and driven from a single
/// thread, so methods take `&mut self` and implementations need not be
/// `Sync`.
///
/// Writes issued between [`begin`](Self::begin) and
/// [`commit`](Self::commit) either all persist or, after
/// [`abort`](Self::abort), none do. Outside a transaction each call is
/// applied on its own.
pub trait StorageEngine: Send + 'static {
    /// Start a transaction.
    fn begin(&mut self) -> Result<()>;

    /// Persist everything written since [`begin`](Self::begin).
    fn commit(&mut self) -> Result<()>;

    /// Discard everything written since [`begin`](Self::begin). A no-op when
    /// no transaction is open.
    fn abort(&mut self) -> Result<()>;

    /// Read the current snapshot, if any.
    fn read_cache(&mut self) -> Result<Option<CacheRecord>>;

    /// Write `record` into the slot. The slot must be empty.
    fn write_cache(&mut self, record: &CacheRecord) -> Result<()>;

    /// Remove the current snapshot. Returns `true` if one was removed.
    fn delete_cache(&mut self) -> Result<bool>;
}
