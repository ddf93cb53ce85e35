//! # Agentstore - Pluggable Key-Value Storage Contract
//!
//! Agentstore is the storage abstraction layer of an identity agent platform.
//! Higher-level components (connection records, key material, protocol state)
//! persist opaque byte documents through a uniform provider/store contract
//! without depending on a specific database engine.
//!
//! ## Key Concepts
//!
//! - **Provider**: owns a connection target and the set of currently open stores
//! - **Store**: a single named logical keyspace of key -> byte-value entries
//! - **StoreIterator**: a cursor over an ordered key range with deferred errors
//! - **End-key suffix marker**: a reserved sentinel ([`END_KEY_SUFFIX`]) that turns
//!   an upper bound into a prefix match
//!
//! ## Quick Start
//!
//! ```rust
//! use agentstore::memory::InMemoryProvider;
//! use agentstore::{Provider, StorageProvider, StoreProvider};
//!
//! # fn main() -> Result<(), agentstore::errors::StorageError> {
//! let provider = Provider::new(InMemoryProvider::new());
//! let store = provider.open_store("connections")?;
//!
//! store.put("did:example:123", b"record")?;
//! let value = store.get("did:example:123")?;
//! assert_eq!(value, b"record");
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! The contract is backend-agnostic. This crate ships an in-memory backend
//! ([`memory`]) for tests and ephemeral data; the `agentstore-sqlite-adapter`
//! crate provides a persistent SQL-backed realization. All backends translate
//! the shared [`range::KeyRange`] boundary model, so range queries behave
//! identically regardless of the engine underneath.
//!
//! ## Module Organization
//!
//! - [`common`] - Shared helper types
//! - [`errors`] - Error taxonomy and result definitions
//! - [`iterator`] - Range cursor abstraction and providers
//! - [`memory`] - Built-in in-memory backend
//! - [`provider`] - Provider contract and facade
//! - [`range`] - Range boundary model and the end-key suffix marker
//! - [`store`] - Store contract and facade

pub mod common;
pub mod errors;
pub mod iterator;
pub mod memory;
pub mod provider;
pub mod range;
pub mod store;

pub use common::{atomic, Atomic};
pub use iterator::{BufferedEntryProvider, EntryIteratorProvider, StoreIterator};
pub use provider::{Provider, StorageProvider};
pub use range::{KeyRange, RangeEnd, END_KEY_SUFFIX};
pub use store::{Store, StoreProvider};
