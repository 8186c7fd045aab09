//! SQLite storage implementation for Ratekeeper.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the `RateStore` trait defined in `ratekeeper-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single writer actor that serializes all writes
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//!
//! ```text
//! market-data (fetch)  ->  core (normalize, ingest)
//!                                  │
//!                                  ▼
//!                      storage-sqlite (this crate)
//!                                  │
//!                                  ▼
//!                              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod rates;
pub mod schema;
pub mod utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use rates::{RateDB, RateRepository};

// Re-export from ratekeeper-core for convenience
pub use ratekeeper_core::errors::{DatabaseError, Error, Result};
