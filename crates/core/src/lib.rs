//! Ratekeeper Core - Domain types, services, and traits.
//!
//! This crate turns fetched NBP payloads into normalized quotes and drives
//! ingestion runs. It is database-agnostic and defines the `RateStore` trait
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod ingest;
pub mod rates;
pub mod utils;

pub use errors::Error;
pub use errors::Result;
