//! Storage-specific error types.
//!
//! These errors are internal to the storage layer and are converted to
//! `clubfund_core::Error` before being returned to callers.

use clubfund_core::errors::{DatabaseError, Error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Transaction {0} is already stored")]
    DuplicateTransaction(String),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockPoisoned(e) => Error::Database(DatabaseError::LockPoisoned(e)),
            StorageError::DuplicateTransaction(id) => Error::Database(
                DatabaseError::TransactionFailed(format!("duplicate transaction id {}", id)),
            ),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StorageError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StorageError::LockPoisoned(err.to_string())
    }
}
