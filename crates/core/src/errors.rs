//! Core error types for Ratekeeper.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use thiserror::Error;

use ratekeeper_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for ingestion and storage operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A batch contained a key that already exists (or appears twice).
    /// The whole batch was rolled back.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Failed to parse date '{value}': {source}")]
    DateParse {
        value: String,
        #[source]
        source: ChronoParseError,
    },
}

/// Rejected ingestion settings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Chunk size must be between 1 and {max} days, got {value}")]
    ChunkSizeOutOfRange { value: u32, max: u32 },

    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl Error {
    /// True when the error is a rolled-back batch caused by a key conflict.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Error::Database(DatabaseError::DuplicateKey(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_detection() {
        let err: Error = DatabaseError::DuplicateKey("USD@2024-01-02".to_string()).into();
        assert!(err.is_duplicate_key());
        assert_eq!(
            err.to_string(),
            "Database operation failed: Duplicate key: USD@2024-01-02"
        );

        let err: Error = DatabaseError::QueryFailed("boom".to_string()).into();
        assert!(!err.is_duplicate_key());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ChunkSizeOutOfRange { value: 94, max: 93 };
        assert_eq!(
            err.to_string(),
            "Chunk size must be between 1 and 93 days, got 94"
        );
    }
}
