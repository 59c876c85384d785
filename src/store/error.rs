//! Storage error types.

use thiserror::Error;

/// Storage-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("book store lock poisoned")]
    LockPoisoned,

    /// The identifier counter cannot advance any further.
    #[error("book identifier space exhausted")]
    IdExhausted,
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
