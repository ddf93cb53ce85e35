use crate::errors::{StorageError, StorageResult};
use crate::iterator::{EntryIteratorProvider, StoreIterator};
use crate::range::KeyRange;
use crate::store::StoreProvider;
use crossbeam_skiplist::SkipMap;
use std::collections::Bound::{Excluded, Included};
use std::sync::Arc;

/// In-memory store implementation using a concurrent skip list.
///
/// # Purpose
/// `InMemoryStore` provides fast, thread-safe access to one logical keyspace
/// held entirely in memory. The skip list keeps entries in byte-lexicographic
/// key order, so range iteration maps directly onto ordered traversal.
///
/// # Characteristics
/// - **Thread-Safe**: can be cloned and shared across threads
/// - **Ordered**: O(log n) operations over sorted keys
/// - **Live Iteration**: cursors re-seek the map on every step, so writes made
///   mid-iteration are observed
/// - **No Persistence**: data lives only as long as the backing map
#[derive(Clone)]
pub struct InMemoryStore {
    inner: Arc<InMemoryStoreInner>,
}

impl InMemoryStore {
    /// Creates an empty store with the given (already namespaced) name.
    pub fn new(name: &str) -> Self {
        InMemoryStore {
            inner: Arc::new(InMemoryStoreInner {
                name: name.to_string(),
                data: Arc::new(SkipMap::new()),
            }),
        }
    }
}

struct InMemoryStoreInner {
    name: String,
    data: Arc<SkipMap<String, Vec<u8>>>,
}

impl StoreProvider for InMemoryStore {
    fn name(&self) -> StorageResult<String> {
        Ok(self.inner.name.clone())
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::key_mandatory());
        }
        // SkipMap::insert replaces any existing entry for the key
        self.inner.data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        if key.is_empty() {
            return Err(StorageError::key_mandatory());
        }
        match self.inner.data.get(key) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(StorageError::data_not_found()),
        }
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::key_mandatory());
        }
        self.inner.data.remove(key);
        Ok(())
    }

    fn iterator(&self, start_key: &str, end_key: &str) -> StoreIterator {
        match KeyRange::new(start_key, end_key) {
            KeyRange::Empty => StoreIterator::empty(),
            range => StoreIterator::new(InMemoryEntryProvider {
                data: Arc::clone(&self.inner.data),
                range,
                cursor: None,
            }),
        }
    }
}

/// Lazy cursor over the skip list.
///
/// Tracks the last yielded key and re-seeks past it on every step instead of
/// materializing the range up front.
struct InMemoryEntryProvider {
    data: Arc<SkipMap<String, Vec<u8>>>,
    range: KeyRange,
    cursor: Option<String>,
}

impl EntryIteratorProvider for InMemoryEntryProvider {
    fn next_entry(&mut self) -> Option<StorageResult<(String, Vec<u8>)>> {
        let start = match &self.range {
            KeyRange::Empty => return None,
            KeyRange::Span { start, .. } => start.clone(),
        };

        let entry = match &self.cursor {
            None => self.data.lower_bound(Included(start.as_str()))?,
            Some(cursor) => self.data.lower_bound(Excluded(cursor.as_str()))?,
        };

        let key = entry.key().clone();
        self.cursor = Some(key.clone());

        // every candidate is >= start, so the first key past the upper bound
        // ends the traversal
        if self.range.is_past(&key) {
            return None;
        }

        Some(Ok((key, entry.value().clone())))
    }
}
