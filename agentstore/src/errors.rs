use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::{atomic, Atomic};

/// Error kinds for storage operations.
///
/// Every backend maps its native failures onto these kinds, so callers can
/// handle errors programmatically without matching on message text.
///
/// # Examples
///
/// ```rust,ignore
/// use agentstore::errors::{ErrorKind, StorageError, StorageResult};
///
/// fn example() -> StorageResult<()> {
///     Err(StorageError::new("connection refused", ErrorKind::ConnectionError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Caller bug: empty key or store name. Never retried.
    InvalidArgument,
    /// Provider configuration is unusable (e.g. blank connection target).
    InvalidConfig,
    /// Absence of data. A normal outcome of `get`, distinguishable from failures.
    NotFound,
    /// Backend unreachable or connection target malformed. Retryable by the caller.
    ConnectionError,
    /// Query or statement execution failed for a reason other than absence.
    BackendError,
    /// An iterator was used after `release()`. Terminal.
    IteratorReleased,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "Invalid argument"),
            ErrorKind::InvalidConfig => write!(f, "Invalid configuration"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::ConnectionError => write!(f, "Connection error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::IteratorReleased => write!(f, "Iterator released"),
        }
    }
}

/// Storage error type shared by all backends.
///
/// `StorageError` encapsulates the error message, kind, and optional cause.
/// Validation errors are raised synchronously; backend failures wrap the
/// underlying cause for diagnostics while exposing a stable kind for
/// programmatic handling. Nothing in this crate is fatal to the process -
/// every failure is returned to the caller.
///
/// # Examples
///
/// ```rust,ignore
/// use agentstore::errors::{ErrorKind, StorageError};
///
/// let cause = StorageError::new("disk I/O error", ErrorKind::BackendError);
/// let err = StorageError::new_with_cause("failed to get row", ErrorKind::BackendError, cause);
/// assert_eq!(err.kind(), &ErrorKind::BackendError);
/// ```
#[derive(Clone)]
pub struct StorageError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StorageError>>,
    backtrace: Atomic<Backtrace>,
}

impl StorageError {
    /// Creates a new `StorageError` with the specified message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StorageError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `StorageError` chained onto an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StorageError) -> Self {
        StorageError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// The shared not-found sentinel.
    ///
    /// `get` on an absent key always returns exactly this error, so callers
    /// can implement insert-if-absent patterns by comparing [`ErrorKind::NotFound`]
    /// rather than message text.
    pub fn data_not_found() -> Self {
        StorageError::new("data not found", ErrorKind::NotFound)
    }

    /// Validation error for an empty entry key.
    pub fn key_mandatory() -> Self {
        StorageError::new("key is mandatory", ErrorKind::InvalidArgument)
    }

    /// Validation error for an empty store name.
    pub fn store_name_required() -> Self {
        StorageError::new("store name is required", ErrorKind::InvalidArgument)
    }

    /// Terminal error reported when a released iterator is advanced again.
    pub fn iterator_released() -> Self {
        StorageError::new("iterator has been released", ErrorKind::IteratorReleased)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StorageError> {
        self.cause.as_deref()
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print the message followed by the cause chain, or the backtrace at the root
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for storage operations.
///
/// `StorageResult<T>` is shorthand for `Result<T, StorageError>`.
pub type StorageResult<T> = Result<T, StorageError>;
