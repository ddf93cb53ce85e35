//! Built-in in-memory backend.
//!
//! Suitable for tests and ephemeral data; all entries are lost when the
//! provider is closed.

mod provider;
mod store;

pub use provider::InMemoryProvider;
pub use store::InMemoryStore;
