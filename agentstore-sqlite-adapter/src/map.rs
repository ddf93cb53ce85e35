use crate::config::SqliteConfig;
use crate::wrapper::{backend_error, connection_error};
use agentstore::errors::{StorageError, StorageResult};
use agentstore::iterator::{BufferedEntryProvider, StoreIterator};
use agentstore::range::{KeyRange, RangeEnd};
use agentstore::store::StoreProvider;
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::sync::Arc;
use std::time::Duration;

/// SQLite-backed store implementation.
///
/// # Purpose
/// One `SqliteStore` maps one logical keyspace onto one table of
/// `(k TEXT PRIMARY KEY, v BLOB)` rows. Uses the PIMPL pattern with
/// `Arc<SqliteStoreInner>`: clones share a single connection to the database
/// file, guarded by a mutex because SQLite connections are not `Sync`.
///
/// # Characteristics
/// - **Persistent**: entries survive provider restarts
/// - **Atomic upserts**: `put` is a single `INSERT .. ON CONFLICT` statement,
///   so a concurrent reader sees either the old or the new value
/// - **Shared-file visibility**: WAL journal mode lets independent handles
///   (each with its own connection) observe each other's committed writes
/// - **Materialized cursors**: range queries collect matching rows up front,
///   because the connection mutex cannot be held across caller-driven
///   iteration steps
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<SqliteStoreInner>,
}

impl SqliteStore {
    /// Opens a connection to the configured database file and creates the
    /// store's table if it does not exist yet (idempotent).
    pub(crate) fn open(config: &SqliteConfig, name: &str) -> StorageResult<SqliteStore> {
        let db_path = config.db_path();
        let conn = Connection::open(&db_path).map_err(|e| {
            connection_error(&format!("failed to create new connection {}", db_path), e)
        })?;

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms()))
            .map_err(|e| backend_error("failed to configure connection", e))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| backend_error("failed to configure connection", e))?;

        let table = quote_identifier(name);
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (k TEXT PRIMARY KEY, v BLOB NOT NULL)",
                table
            ),
            [],
        )
        .map_err(|e| backend_error("failed to create store", e))?;

        Ok(SqliteStore {
            inner: Arc::new(SqliteStoreInner {
                name: name.to_string(),
                table,
                conn: Mutex::new(conn),
            }),
        })
    }
}

struct SqliteStoreInner {
    name: String,
    table: String,
    conn: Mutex<Connection>,
}

impl SqliteStoreInner {
    fn query_range(
        &self,
        start: &str,
        end: &RangeEnd,
    ) -> StorageResult<Vec<(String, Vec<u8>)>> {
        let (sql, params): (String, Vec<String>) = match end {
            RangeEnd::Literal(bound) => (
                format!(
                    "SELECT k, v FROM {} WHERE k >= ?1 AND k < ?2 ORDER BY k",
                    self.table
                ),
                vec![start.to_string(), bound.clone()],
            ),
            // substr comparison uses the column's BINARY collation, keeping
            // prefix matching byte-exact (LIKE is ASCII case-insensitive)
            RangeEnd::Prefix(prefix) => (
                format!(
                    "SELECT k, v FROM {} WHERE k >= ?1 AND (k < ?2 OR substr(k, 1, length(?2)) = ?2) ORDER BY k",
                    self.table
                ),
                vec![start.to_string(), prefix.clone()],
            ),
        };

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| backend_error("failed to query rows", e))?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(|e| backend_error("failed to query rows", e))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| backend_error("failed to query rows", e))?);
        }
        Ok(entries)
    }
}

impl StoreProvider for SqliteStore {
    fn name(&self) -> StorageResult<String> {
        Ok(self.inner.name.clone())
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::key_mandatory());
        }

        let conn = self.inner.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO {} (k, v) VALUES (?1, ?2) ON CONFLICT(k) DO UPDATE SET v = excluded.v",
                self.inner.table
            ),
            params![key, value],
        )
        .map_err(|e| backend_error("failed to insert key and value record", e))?;
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        if key.is_empty() {
            return Err(StorageError::key_mandatory());
        }

        let conn = self.inner.conn.lock();
        let value = conn
            .query_row(
                &format!("SELECT v FROM {} WHERE k = ?1", self.inner.table),
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(|e| backend_error("failed to get row", e))?;

        value.ok_or_else(StorageError::data_not_found)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::key_mandatory());
        }

        let conn = self.inner.conn.lock();
        conn.execute(
            &format!("DELETE FROM {} WHERE k = ?1", self.inner.table),
            [key],
        )
        .map_err(|e| backend_error("failed to delete row", e))?;
        Ok(())
    }

    fn iterator(&self, start_key: &str, end_key: &str) -> StoreIterator {
        match KeyRange::new(start_key, end_key) {
            KeyRange::Empty => StoreIterator::empty(),
            KeyRange::Span { start, end } => match self.inner.query_range(&start, &end) {
                Ok(entries) => StoreIterator::new(BufferedEntryProvider::new(entries)),
                Err(e) => StoreIterator::failed(e),
            },
        }
    }
}

/// Quotes a store name for embedding as a SQL identifier.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
