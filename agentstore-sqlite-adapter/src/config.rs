use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite adapter configuration wrapper.
///
/// A cloneable, thread-safe configuration holder for the SQLite backend.
/// Uses the PIMPL pattern with `Arc<SqliteConfigInner>` so clones share one
/// underlying configuration.
///
/// Parameters:
/// - `db_path`: the connection target - the database file path. Its format is
///   delegated entirely to SQLite; this adapter only rejects a blank path.
/// - `db_prefix`: optional store-name prefix. Every logical store name is
///   namespaced as `prefix + name`, allowing multiple logical providers to
///   share one database file without collision.
/// - `busy_timeout_ms`: how long a statement waits on a locked database
///   before failing. A timed-out statement surfaces as a backend error, never
///   a silent hang.
#[derive(Clone)]
pub struct SqliteConfig {
    inner: Arc<SqliteConfigInner>,
}

impl SqliteConfig {
    /// Creates a configuration with an empty path, no prefix, and a 5 second
    /// busy timeout.
    #[inline]
    pub fn new() -> SqliteConfig {
        SqliteConfig {
            inner: Arc::new(SqliteConfigInner {
                db_path: RwLock::new(String::new()),
                db_prefix: RwLock::new(String::new()),
                busy_timeout_ms: AtomicU64::new(DEFAULT_BUSY_TIMEOUT_MS),
            }),
        }
    }

    /// Returns the database file path.
    #[inline]
    pub fn db_path(&self) -> String {
        self.inner.db_path.read().clone()
    }

    /// Sets the database file path.
    #[inline]
    pub(crate) fn set_db_path(&self, db_path: &str) {
        *self.inner.db_path.write() = db_path.to_string();
    }

    /// Returns the store-name prefix.
    #[inline]
    pub fn db_prefix(&self) -> String {
        self.inner.db_prefix.read().clone()
    }

    /// Sets the store-name prefix.
    #[inline]
    pub(crate) fn set_db_prefix(&self, db_prefix: &str) {
        *self.inner.db_prefix.write() = db_prefix.to_string();
    }

    /// Returns the busy timeout in milliseconds.
    #[inline]
    pub fn busy_timeout_ms(&self) -> u64 {
        self.inner.busy_timeout_ms.load(Ordering::Relaxed)
    }

    /// Sets the busy timeout in milliseconds.
    #[inline]
    pub(crate) fn set_busy_timeout_ms(&self, timeout_ms: u64) {
        self.inner.busy_timeout_ms.store(timeout_ms, Ordering::Relaxed);
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        SqliteConfig::new()
    }
}

struct SqliteConfigInner {
    db_path: RwLock<String>,
    db_prefix: RwLock<String>,
    busy_timeout_ms: AtomicU64,
}
