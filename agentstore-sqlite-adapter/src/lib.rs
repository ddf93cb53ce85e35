//! SQLite storage adapter for agentstore.
//!
//! Provides a persistent, SQL-backed realization of the agentstore
//! provider/store contract. A provider maps to one SQLite database file, each
//! logical store to one table of `(k TEXT PRIMARY KEY, v BLOB)` rows, and
//! range queries translate the shared [`agentstore::range::KeyRange`] model
//! into SQL predicates.
//!
//! ```rust,ignore
//! use agentstore::{Provider, StorageProvider, StoreProvider};
//! use agentstore_sqlite_adapter::SqliteProvider;
//!
//! let provider = Provider::new(
//!     SqliteProvider::builder()
//!         .db_path("/var/lib/agent/agent.db")
//!         .db_prefix("prefixdb")
//!         .build()?,
//! );
//! let store = provider.open_store("connections")?;
//! store.put("did:example:123", b"record")?;
//! ```

mod config;
mod map;
mod store;
mod wrapper;

pub use config::SqliteConfig;
pub use map::SqliteStore;
pub use store::{SqliteProvider, SqliteProviderBuilder};
