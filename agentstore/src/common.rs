//! Shared helper types used across the storage contract.

use parking_lot::RwLock;
use std::sync::Arc;

/// A cheaply cloneable, thread-safe cell.
///
/// Used where a value must be shared across clones of a handle while staying
/// mutable behind the scenes (e.g. the lazily formatted backtrace inside
/// [`crate::errors::StorageError`]).
pub type Atomic<T> = Arc<RwLock<T>>;

/// Wraps a value in an [`Atomic`] cell.
pub fn atomic<T>(value: T) -> Atomic<T> {
    Arc::new(RwLock::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_read_write() {
        let cell = atomic(1u32);
        assert_eq!(*cell.read(), 1);
        *cell.write() = 2;
        assert_eq!(*cell.read(), 2);
    }

    #[test]
    fn test_atomic_shared_across_clones() {
        let cell = atomic("a".to_string());
        let clone = cell.clone();
        *clone.write() = "b".to_string();
        assert_eq!(*cell.read(), "b");
    }
}
