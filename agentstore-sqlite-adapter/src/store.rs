use crate::config::SqliteConfig;
use crate::map::SqliteStore;
use crate::wrapper::connection_error;
use agentstore::errors::{ErrorKind, StorageError, StorageResult};
use agentstore::provider::StorageProvider;
use agentstore::store::Store;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rusqlite::Connection;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// SQLite-backed storage provider.
///
/// # Purpose
///
/// `SqliteProvider` owns one database file and the registry of currently
/// open stores against it. Each logical store maps to one table; the
/// optional name prefix namespaces tables so multiple logical providers can
/// share one file without collision.
///
/// # Characteristics
///
/// - **Lazy resources**: construction only probes that the file can be
///   opened; tables and per-store connections are created on `open_store`
/// - **Cached handles**: reopening a name yields a handle bound to the same
///   underlying store, so independent handles observe each other's writes
/// - **Graceful teardown**: `close_store` and `close` evict handles from the
///   registry; the backing connections are dropped once the last caller
///   handle goes out of scope
#[derive(Clone)]
pub struct SqliteProvider {
    inner: Arc<SqliteProviderInner>,
}

struct SqliteProviderInner {
    config: SqliteConfig,
    stores: DashMap<String, SqliteStore>,
}

impl SqliteProvider {
    /// Opens a provider over the database file at `db_path` with default
    /// settings. Use [`builder()`](SqliteProvider::builder) for more control.
    pub fn new(db_path: &str) -> StorageResult<SqliteProvider> {
        SqliteProvider::builder().db_path(db_path).build()
    }

    /// Returns a builder for configuring a provider.
    pub fn builder() -> SqliteProviderBuilder {
        SqliteProviderBuilder {
            config: SqliteConfig::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn open_store_count(&self) -> usize {
        self.inner.stores.len()
    }
}

impl Debug for SqliteProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteProvider")
            .field("db_path", &self.inner.config.db_path())
            .field("open_stores", &self.inner.stores.len())
            .finish()
    }
}

impl StorageProvider for SqliteProvider {
    fn open_store(&self, name: &str) -> StorageResult<Store> {
        if name.is_empty() {
            return Err(StorageError::store_name_required());
        }

        let full_name = format!("{}{}", self.inner.config.db_prefix(), name);
        match self.inner.stores.entry(full_name) {
            Entry::Occupied(entry) => Ok(Store::new(entry.get().clone())),
            Entry::Vacant(entry) => {
                let store = SqliteStore::open(&self.inner.config, entry.key())?;
                log::debug!("opened store {}", entry.key());
                entry.insert(store.clone());
                Ok(Store::new(store))
            }
        }
    }

    fn close_store(&self, name: &str) -> StorageResult<()> {
        let full_name = format!("{}{}", self.inner.config.db_prefix(), name);
        if self.inner.stores.remove(&full_name).is_some() {
            log::debug!("closed store {}", full_name);
        }
        Ok(())
    }

    fn close(&self) -> StorageResult<()> {
        self.inner.stores.clear();
        Ok(())
    }
}

/// Builder for [`SqliteProvider`].
pub struct SqliteProviderBuilder {
    config: SqliteConfig,
}

impl SqliteProviderBuilder {
    /// Sets the database file path. Mandatory.
    pub fn db_path(self, db_path: &str) -> Self {
        self.config.set_db_path(db_path);
        self
    }

    /// Sets the optional store-name prefix.
    pub fn db_prefix(self, db_prefix: &str) -> Self {
        self.config.set_db_prefix(db_prefix);
        self
    }

    /// Sets how long statements wait on a locked database, in milliseconds.
    pub fn busy_timeout_ms(self, timeout_ms: u64) -> Self {
        self.config.set_busy_timeout_ms(timeout_ms);
        self
    }

    /// Validates the configuration and probes the connection target.
    ///
    /// # Errors
    /// * `InvalidConfig` if the path is blank
    /// * `ConnectionError` if the file cannot be opened
    pub fn build(self) -> StorageResult<SqliteProvider> {
        let db_path = self.config.db_path();
        if db_path.trim().is_empty() {
            return Err(StorageError::new(
                "db path cannot be blank",
                ErrorKind::InvalidConfig,
            ));
        }

        // fail fast on an unusable target instead of on the first open_store
        Connection::open(&db_path)
            .map_err(|e| connection_error("failed to open connection", e))?;

        Ok(SqliteProvider {
            inner: Arc::new(SqliteProviderInner {
                config: self.config,
                stores: DashMap::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentstore::provider::Provider;
    use agentstore::store::StoreProvider;
    use tempfile::TempDir;

    #[ctor::ctor]
    fn init() {
        colog::init();
    }

    fn db_path(dir: &TempDir) -> String {
        dir.path().join("agent.db").to_string_lossy().into_owned()
    }

    #[test]
    fn test_blank_path_is_rejected() {
        let err = SqliteProvider::new("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidConfig);
        assert_eq!(err.message(), "db path cannot be blank");

        let err = SqliteProvider::new("   ").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_unusable_path_fails_at_build() {
        let dir = TempDir::new().unwrap();
        // a directory is not a valid database file
        let err = SqliteProvider::new(&dir.path().to_string_lossy()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionError);
        assert_eq!(err.message(), "failed to open connection");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_open_store_empty_name() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        let err = provider.open_store("").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidArgument);
        assert_eq!(err.message(), "store name is required");
    }

    #[test]
    fn test_reopened_store_shares_container() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        let handle_a = provider.open_store("connections").unwrap();
        let handle_b = provider.open_store("connections").unwrap();

        handle_a.put("did:example:123", b"record").unwrap();
        assert_eq!(handle_b.get("did:example:123").unwrap(), b"record");
        assert_eq!(provider.open_store_count(), 1);
    }

    #[test]
    fn test_stores_are_isolated() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        let connections = provider.open_store("connections").unwrap();
        let credentials = provider.open_store("credentials").unwrap();

        connections.put("key1", b"value1").unwrap();
        let err = credentials.get("key1").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_prefix_namespaces_store_names() {
        let dir = TempDir::new().unwrap();
        let path = db_path(&dir);

        let plain = SqliteProvider::new(&path).unwrap();
        let prefixed = SqliteProvider::builder()
            .db_path(&path)
            .db_prefix("prefixdb_")
            .build()
            .unwrap();

        let store = prefixed.open_store("test").unwrap();
        assert_eq!(store.name().unwrap(), "prefixdb_test");
        store.put("key1", b"value1").unwrap();

        // same logical name without the prefix is a different container
        let other = plain.open_store("test").unwrap();
        let err = other.get("key1").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
    }

    #[test]
    fn test_close_store_evicts_only_named_store() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        for name in ["store1", "store2", "store3", "store4", "store5"] {
            provider.open_store(name).unwrap();
        }
        assert_eq!(provider.open_store_count(), 5);

        for name in ["store1", "store3", "store5"] {
            provider.close_store(name).unwrap();
        }
        assert_eq!(provider.open_store_count(), 2);
    }

    #[test]
    fn test_close_unknown_store_is_ok() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();
        assert!(provider.close_store("never-opened").is_ok());
    }

    #[test]
    fn test_close_is_idempotent_and_empties_registry() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        provider.open_store("store1").unwrap();
        provider.open_store("store2").unwrap();

        assert!(provider.close().is_ok());
        assert_eq!(provider.open_store_count(), 0);
        assert!(provider.close().is_ok());
    }

    #[test]
    fn test_data_survives_close_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = db_path(&dir);
        let provider = SqliteProvider::new(&path).unwrap();

        let store = provider.open_store("connections").unwrap();
        store.put("did:example:123", b"record").unwrap();
        drop(store);
        provider.close().unwrap();

        let provider = SqliteProvider::new(&path).unwrap();
        let store = provider.open_store("connections").unwrap();
        assert_eq!(store.get("did:example:123").unwrap(), b"record");
    }

    #[test]
    fn test_reopen_after_close_through_same_provider() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        let store = provider.open_store("connections").unwrap();
        store.put("key1", b"value1").unwrap();
        drop(store);
        provider.close_store("connections").unwrap();

        let store = provider.open_store("connections").unwrap();
        assert_eq!(store.get("key1").unwrap(), b"value1");
    }

    #[test]
    fn test_independent_providers_share_file() {
        let dir = TempDir::new().unwrap();
        let path = db_path(&dir);

        let provider_a = SqliteProvider::new(&path).unwrap();
        let provider_b = SqliteProvider::new(&path).unwrap();

        let store_a = provider_a.open_store("connections").unwrap();
        let store_b = provider_b.open_store("connections").unwrap();

        store_a.put("did:example:123", b"record").unwrap();
        assert_eq!(store_b.get("did:example:123").unwrap(), b"record");
    }

    #[test]
    fn test_debug_shows_connection_target() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();
        provider.open_store("connections").unwrap();

        let debug = format!("{:?}", provider);
        assert!(debug.contains("agent.db"));
        assert!(debug.contains("open_stores: 1"));
    }

    #[test]
    fn test_facade_wraps_provider() {
        let dir = TempDir::new().unwrap();
        let provider = Provider::new(SqliteProvider::new(&db_path(&dir)).unwrap());

        let store = provider.open_store("connections").unwrap();
        store.put("key1", b"value1").unwrap();
        assert_eq!(store.get("key1").unwrap(), b"value1");
        provider.close().unwrap();
    }

    #[test]
    fn test_concurrent_open_store_single_winner() {
        let dir = TempDir::new().unwrap();
        let provider = SqliteProvider::new(&db_path(&dir)).unwrap();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let provider = provider.clone();
                scope.spawn(move || {
                    let store = provider.open_store("shared").unwrap();
                    store
                        .put(&format!("key{}", i), format!("value{}", i).as_bytes())
                        .unwrap();
                });
            }
        });

        assert_eq!(provider.open_store_count(), 1);
        let store = provider.open_store("shared").unwrap();
        for i in 0..8 {
            assert_eq!(
                store.get(&format!("key{}", i)).unwrap(),
                format!("value{}", i).as_bytes()
            );
        }
    }
}
