//! Bridges rusqlite failures into the storage error taxonomy.
//!
//! Every backend failure keeps its underlying SQLite cause in the error chain
//! for diagnostics while exposing a stable, backend-independent kind.

use agentstore::errors::{ErrorKind, StorageError};

/// Wraps a SQLite failure as a `BackendError` with an operation context.
pub(crate) fn backend_error(context: &str, cause: rusqlite::Error) -> StorageError {
    StorageError::new_with_cause(
        context,
        ErrorKind::BackendError,
        StorageError::new(&cause.to_string(), ErrorKind::BackendError),
    )
}

/// Wraps a SQLite failure as a `ConnectionError` with an operation context.
pub(crate) fn connection_error(context: &str, cause: rusqlite::Error) -> StorageError {
    StorageError::new_with_cause(
        context,
        ErrorKind::ConnectionError,
        StorageError::new(&cause.to_string(), ErrorKind::ConnectionError),
    )
}
