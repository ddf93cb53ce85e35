use crate::errors::{StorageError, StorageResult};
use std::sync::Arc;

/// Trait for backend cursor implementations feeding a [`StoreIterator`].
///
/// # Purpose
///
/// `EntryIteratorProvider` defines the contract for anything that can stream
/// `(key, value)` entries of a range query in ascending key order. A backend
/// either walks its native structure lazily (the in-memory backend re-seeks
/// an ordered map) or materializes rows up front ([`BufferedEntryProvider`],
/// used where the underlying connection cannot be borrowed across calls).
///
/// # Error Handling
///
/// A `Some(Err(..))` item reports a row-level failure (e.g. a scan error);
/// the facade records it in the iterator's error slot and stops iteration.
pub trait EntryIteratorProvider: Send + Sync {
    /// Produces the next matching entry, or `None` when exhausted.
    fn next_entry(&mut self) -> Option<StorageResult<(String, Vec<u8>)>>;
}

/// Cursor provider over pre-materialized rows.
///
/// Used by backends whose result cursors cannot outlive the statement that
/// produced them: the backend runs the range query eagerly, collects the
/// matching rows, and hands them over in ascending key order.
pub struct BufferedEntryProvider {
    entries: std::vec::IntoIter<(String, Vec<u8>)>,
}

impl BufferedEntryProvider {
    /// Creates a provider over `entries`, which must already be sorted by key.
    pub fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        BufferedEntryProvider {
            entries: entries.into_iter(),
        }
    }
}

impl EntryIteratorProvider for BufferedEntryProvider {
    fn next_entry(&mut self) -> Option<StorageResult<(String, Vec<u8>)>> {
        self.entries.next().map(Ok)
    }
}

struct StoreIteratorInner {
    provider: Option<Box<dyn EntryIteratorProvider>>,
    current: Option<(String, Vec<u8>)>,
    error: Option<StorageError>,
    released: bool,
}

/// Cursor over an ordered key range of a store.
///
/// # Purpose
///
/// `StoreIterator` streams matching entries one at a time with deterministic
/// resource release. Opening an iterator never fails synchronously: a failed
/// range query surfaces through [`error()`](StoreIterator::error) on the
/// first [`next()`](StoreIterator::next) because queries may be issued lazily.
///
/// # Characteristics
///
/// - **Deferred errors**: the error slot is set at most once and never cleared
/// - **Deterministic release**: [`release()`](StoreIterator::release) drops the
///   backend cursor; it is idempotent and safe before any `next()`
/// - **Detectable misuse**: advancing a released iterator returns `false` and
///   records a terminal released error instead of panicking
/// - **Single owner**: clones share state through `Arc<Mutex<_>>` for memory
///   safety, but the iterator is owned by whichever task created it and must
///   be released before the store that spawned it is closed
pub struct StoreIterator {
    inner: Arc<parking_lot::Mutex<StoreIteratorInner>>,
}

impl StoreIterator {
    /// Creates an iterator over the given backend cursor provider.
    pub fn new<T: EntryIteratorProvider + 'static>(provider: T) -> Self {
        StoreIterator {
            inner: Arc::new(parking_lot::Mutex::new(StoreIteratorInner {
                provider: Some(Box::new(provider)),
                current: None,
                error: None,
                released: false,
            })),
        }
    }

    /// Creates an iterator whose query already failed.
    ///
    /// `next()` returns `false` immediately and `error()` reports `error`.
    /// The iterator still supports `release()` safely.
    pub fn failed(error: StorageError) -> Self {
        StoreIterator {
            inner: Arc::new(parking_lot::Mutex::new(StoreIteratorInner {
                provider: None,
                current: None,
                error: Some(error),
                released: false,
            })),
        }
    }

    /// Creates an iterator over an empty range.
    pub fn empty() -> Self {
        StoreIterator::new(BufferedEntryProvider::new(Vec::new()))
    }

    /// Advances to the next matching entry.
    ///
    /// Returns `false` when exhausted, when the underlying query failed to
    /// start (in which case `error()` is non-nil), or after `release()`.
    /// A query that matched zero rows simply returns `false` with
    /// `error()` still empty.
    pub fn next(&self) -> bool {
        let mut guard = self.inner.lock();

        if guard.released {
            if guard.error.is_none() {
                guard.error = Some(StorageError::iterator_released());
            }
            guard.current = None;
            return false;
        }

        if guard.error.is_some() {
            guard.current = None;
            return false;
        }

        let provider = match guard.provider.as_mut() {
            Some(provider) => provider,
            None => {
                guard.current = None;
                return false;
            }
        };

        match provider.next_entry() {
            Some(Ok(entry)) => {
                guard.current = Some(entry);
                true
            }
            Some(Err(e)) => {
                guard.current = None;
                guard.error = Some(e);
                false
            }
            None => {
                guard.current = None;
                false
            }
        }
    }

    /// The key of the current entry.
    ///
    /// Valid only immediately after a `next()` that returned `true`; empty
    /// before the first `next()`, after exhaustion, and after `release()`.
    pub fn key(&self) -> String {
        let guard = self.inner.lock();
        guard
            .current
            .as_ref()
            .map(|(key, _)| key.clone())
            .unwrap_or_default()
    }

    /// The value of the current entry.
    ///
    /// Same validity window as [`key()`](StoreIterator::key).
    pub fn value(&self) -> Vec<u8> {
        let guard = self.inner.lock();
        guard
            .current
            .as_ref()
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    /// Releases backend resources held by the cursor.
    ///
    /// Safe to call multiple times and safe to call without ever calling
    /// `next()`. Afterwards `next()` returns `false`, `key()`/`value()`
    /// return empty values, and attempting further iteration records a
    /// terminal released error.
    pub fn release(&self) {
        let mut guard = self.inner.lock();
        guard.provider = None;
        guard.current = None;
        guard.released = true;
    }

    /// The first error encountered, if any. Never clears once set.
    pub fn error(&self) -> Option<StorageError> {
        let guard = self.inner.lock();
        guard.error.clone()
    }
}

impl Clone for StoreIterator {
    fn clone(&self) -> Self {
        StoreIterator {
            inner: Arc::clone(&self.inner),
        }
    }
}
