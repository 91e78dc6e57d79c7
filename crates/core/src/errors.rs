//! Core error types for the club fund.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! are converted to these types by the storage layer.

use thiserror::Error;

use crate::units::UnitError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the club fund.
///
/// Engine failures keep their typed form inside `Error::Unit` so callers can
/// still tell a user mistake from corrupted state.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unit accounting failed: {0}")]
    Unit(#[from] UnitError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Ledger import failed at entry {index}: {source}")]
    Import {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Returns true when the error is something the member can fix from a form.
    pub fn is_user_error(&self) -> bool {
        match self {
            Error::Unit(err) => err.is_user_error(),
            Error::Validation(_) => true,
            Error::Import { source, .. } => source.is_user_error(),
            _ => false,
        }
    }

    /// Returns the engine error, if this error came from the engine.
    pub fn as_unit_error(&self) -> Option<&UnitError> {
        match self {
            Error::Unit(err) => Some(err),
            Error::Import { source, .. } => source.as_unit_error(),
            _ => None,
        }
    }
}

/// Database-agnostic error type for storage operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A write could not be applied atomically.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// The storage lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
