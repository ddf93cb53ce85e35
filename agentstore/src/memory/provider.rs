use crate::errors::{StorageError, StorageResult};
use crate::memory::InMemoryStore;
use crate::provider::StorageProvider;
use crate::store::Store;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory provider implementation.
///
/// # Purpose
/// `InMemoryProvider` manages a set of named [`InMemoryStore`]s. It is the
/// reference backend for the storage contract: every behavior the SQL-backed
/// adapter must exhibit can be checked against this implementation without a
/// database underneath.
///
/// # Characteristics
/// - **Thread-Safe**: the name -> store registry is a concurrent map, so two
///   racing `open_store` calls for one name resolve to a single container
/// - **Prefix Namespacing**: an optional store-name prefix keeps several
///   logical providers apart, mirroring the persistent backends
/// - **No Persistence**: `close()` drops the registry; all data is lost
///
/// # Usage
/// ```rust
/// use agentstore::memory::InMemoryProvider;
/// use agentstore::{Provider, StorageProvider, StoreProvider};
///
/// let provider = Provider::new(InMemoryProvider::new());
/// let store = provider.open_store("connections").unwrap();
/// store.put("key1", b"value1").unwrap();
/// ```
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    inner: Arc<InMemoryProviderInner>,
}

impl InMemoryProvider {
    /// Creates a provider with no store-name prefix.
    pub fn new() -> Self {
        InMemoryProvider::default()
    }

    /// Creates a provider that namespaces every store name with `prefix`.
    pub fn with_store_prefix(prefix: &str) -> Self {
        InMemoryProvider {
            inner: Arc::new(InMemoryProviderInner {
                store_prefix: prefix.to_string(),
                stores: DashMap::new(),
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn open_store_count(&self) -> usize {
        self.inner.stores.len()
    }
}

#[derive(Default)]
struct InMemoryProviderInner {
    store_prefix: String,
    stores: DashMap<String, InMemoryStore>,
}

impl StorageProvider for InMemoryProvider {
    fn open_store(&self, name: &str) -> StorageResult<Store> {
        if name.is_empty() {
            return Err(StorageError::store_name_required());
        }

        let full_name = format!("{}{}", self.inner.store_prefix, name);
        match self.inner.stores.entry(full_name) {
            dashmap::mapref::entry::Entry::Occupied(entry) => Ok(Store::new(entry.get().clone())),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let store = InMemoryStore::new(entry.key());
                log::debug!("created in-memory store {}", entry.key());
                entry.insert(store.clone());
                Ok(Store::new(store))
            }
        }
    }

    fn close_store(&self, name: &str) -> StorageResult<()> {
        let full_name = format!("{}{}", self.inner.store_prefix, name);
        if self.inner.stores.remove(&full_name).is_some() {
            log::debug!("closed in-memory store {}", full_name);
        }
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        self.inner.stores.clear();
        log::debug!("closed in-memory provider");
        Ok(())
    }
}
