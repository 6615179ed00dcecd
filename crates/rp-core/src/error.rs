//! # AppError
//!
//! Centralized error handling for the Rusty-Press data layer.
//! A missing record is never an error here: lookups return `Option`/`bool`.

use thiserror::Error;

/// The primary error type for all rp-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// The underlying key-value store failed (I/O, database, poisoned state).
    #[error("storage failure on `{key}`: {reason}")]
    Storage { key: String, reason: String },

    /// Stored text under `key` is not a JSON array of the expected records.
    #[error("malformed data under `{key}`: {reason}")]
    Serialization { key: String, reason: String },

    /// Validation failure (e.g., empty upload)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Infrastructure failure outside the key-value store (e.g., media disk)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    pub(crate) fn storage(key: &str, err: impl std::fmt::Display) -> Self {
        AppError::Storage {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn serialization(key: &str, err: impl std::fmt::Display) -> Self {
        AppError::Serialization {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

/// A specialized Result type for Rusty-Press logic.
pub type Result<T> = std::result::Result<T, AppError>;
