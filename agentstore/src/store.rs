use crate::errors::StorageResult;
use crate::iterator::StoreIterator;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Low-level interface for store backends.
///
/// # Purpose
///
/// Defines the contract every logical keyspace implementation must satisfy:
/// CRUD plus range iteration over one named container of key -> byte-value
/// entries. Keys are unique within a store; values are opaque byte sequences
/// with no semantic constraints (callers encrypt sensitive values before
/// `put` - encryption-at-rest is not a store concern).
///
/// # Semantics
///
/// - `put` upserts atomically per key: a concurrent `get` for the same key
///   observes either the old or the new value, never a partial write
/// - `get` on an absent key returns the shared not-found sentinel
/// - `delete` of an absent key is a no-op success
/// - `iterator` never fails synchronously; query failures surface through the
///   iterator's error slot
///
/// # Implementations
///
/// - `InMemoryStore`: ordered in-memory storage for tests and ephemeral data
/// - `SqliteStore` (in `agentstore-sqlite-adapter`): persistent SQL storage
///
/// # Thread Safety
///
/// Implementers must be `Send + Sync`; individual operations may execute
/// concurrently across stores and keys, with same-key races resolved by the
/// backend's native atomic row semantics (last writer wins).
pub trait StoreProvider: Send + Sync {
    /// Returns the (namespaced) name of this store.
    fn name(&self) -> StorageResult<String>;

    /// Inserts or replaces the entry for `key`.
    ///
    /// # Errors
    /// * `InvalidArgument` if `key` is empty
    /// * `BackendError` if the underlying write fails
    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()>;

    /// Retrieves the value stored under `key`.
    ///
    /// # Errors
    /// * `InvalidArgument` if `key` is empty
    /// * `NotFound` if no entry exists for `key`
    /// * `BackendError` if the underlying read fails
    fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Removes the entry for `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    /// * `InvalidArgument` if `key` is empty
    /// * `BackendError` if the underlying delete fails
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Opens a cursor over the key range `[start_key, end_key)`.
    ///
    /// Boundary semantics follow [`crate::range::KeyRange`]: an `end_key`
    /// carrying [`crate::range::END_KEY_SUFFIX`] requests a prefix match, and
    /// an empty `end_key` yields an empty result. Errors are deferred to the
    /// returned iterator's `error()` accessor.
    fn iterator(&self, start_key: &str, end_key: &str) -> StoreIterator;
}

/// A single logical keyspace.
///
/// Cheaply cloneable facade over a backend [`StoreProvider`]; clones share
/// the same underlying container, so a write through one handle is observed
/// by every other handle for the same store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn StoreProvider>,
}

impl Deref for Store {
    type Target = Arc<dyn StoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Store {
    /// Wraps a backend implementation.
    ///
    /// The provider is placed behind an `Arc`, so cloning the store only
    /// increments a reference count.
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        Store {
            inner: Arc::new(inner),
        }
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.name().ok())
            .finish()
    }
}
