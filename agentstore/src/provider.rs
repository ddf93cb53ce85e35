use crate::errors::StorageResult;
use crate::store::Store;
use std::ops::Deref;
use std::sync::Arc;

/// Low-level interface for provider backends.
///
/// # Purpose
///
/// A provider owns a connection target and the set of currently open stores
/// against it. It is the only component that creates or destroys backend
/// resources (containers, connections); stores and iterators borrow those
/// resources for their lifetime.
///
/// # Lifecycle
///
/// The provider moves between two states: *open* (accepting `open_store` and
/// `close_store`) and *closed* (after `close`). Closing only invalidates the
/// cached handles, never the provider itself - a later `open_store`
/// transparently re-establishes backend resources.
///
/// # Thread Safety
///
/// The name -> handle registry is shared mutable state reached from arbitrary
/// caller threads. Implementations must guard the lookup-or-create path so
/// that two concurrent `open_store` calls for one name never both win the
/// create path and never corrupt the registry.
pub trait StorageProvider: Send + Sync {
    /// Opens the store registered under `name`, creating its underlying
    /// container if absent (idempotent).
    ///
    /// A name that is already open yields a handle bound to the same
    /// underlying container; independent handles observe each other's writes.
    ///
    /// # Errors
    /// * `InvalidArgument` if `name` is empty
    /// * `ConnectionError` if the backend connection cannot be established
    /// * `BackendError` if container creation fails
    fn open_store(&self, name: &str) -> StorageResult<Store>;

    /// Releases the cached handle for `name` and evicts it from the registry.
    ///
    /// Closing a name that is not currently open is a no-op success, so
    /// callers may close speculatively.
    fn close_store(&self, name: &str) -> StorageResult<()>;

    /// Closes every open store and empties the registry.
    ///
    /// Trivially succeeds when nothing is open; calling it twice in a row
    /// succeeds both times.
    fn close(&self) -> StorageResult<()>;
}

/// Owner of a connection target and its open stores.
///
/// Cheaply cloneable facade over a backend [`StorageProvider`]; clones share
/// the same registry and backend resources.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<dyn StorageProvider>,
}

impl Deref for Provider {
    type Target = Arc<dyn StorageProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Provider {
    /// Wraps a backend implementation.
    pub fn new<T: StorageProvider + 'static>(inner: T) -> Self {
        Provider {
            inner: Arc::new(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, StorageError};
    use crate::iterator::StoreIterator;
    use crate::store::StoreProvider;

    struct MockStore;

    impl StoreProvider for MockStore {
        fn name(&self) -> StorageResult<String> {
            Ok("mock".to_string())
        }

        fn put(&self, _key: &str, _value: &[u8]) -> StorageResult<()> {
            Ok(())
        }

        fn get(&self, _key: &str) -> StorageResult<Vec<u8>> {
            Err(StorageError::data_not_found())
        }

        fn delete(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }

        fn iterator(&self, _start_key: &str, _end_key: &str) -> StoreIterator {
            StoreIterator::empty()
        }
    }

    struct MockProvider;

    impl StorageProvider for MockProvider {
        fn open_store(&self, name: &str) -> StorageResult<Store> {
            if name.is_empty() {
                return Err(StorageError::store_name_required());
            }
            Ok(Store::new(MockStore))
        }

        fn close_store(&self, _name: &str) -> StorageResult<()> {
            Ok(())
        }

        fn close(&self) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_open_store() {
        let provider = Provider::new(MockProvider);
        let store = provider.open_store("test").unwrap();
        assert_eq!(store.name().unwrap(), "mock");
    }

    #[test]
    fn test_open_store_empty_name() {
        let provider = Provider::new(MockProvider);
        let err = provider.open_store("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "store name is required");
    }

    #[test]
    fn test_close_store() {
        let provider = Provider::new(MockProvider);
        assert!(provider.close_store("test").is_ok());
    }

    #[test]
    fn test_close() {
        let provider = Provider::new(MockProvider);
        assert!(provider.close().is_ok());
        assert!(provider.close().is_ok());
    }

    #[test]
    fn test_clones_share_backend() {
        let provider = Provider::new(MockProvider);
        let clone = provider.clone();
        assert!(clone.open_store("test").is_ok());
    }
}
