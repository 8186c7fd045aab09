//! Ratekeeper Market Data Crate
//!
//! Fetch layer for NBP exchange-rate and gold-price history.
//!
//! # Overview
//!
//! The NBP API only serves a bounded window per request, so a long history is
//! requested as many small windows:
//!
//! ```text
//! +------------------+
//! |   [start, end]   |
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    partition     |  (ordered, contiguous DateRanges)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | FetchOrchestrator|  (join_all over ranges)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | ResilientFetcher |  (retry + exponential backoff per range)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    JsonSource    |  (NbpClient over reqwest)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`DateRange`] - Inclusive request window
//! - [`Endpoint`] - Collection URL plus the instrument kind it serves
//! - [`FetchOutcome`] - Payload, or the attempts spent before giving up
//! - [`FetchBatch`] - Every range outcome of one endpoint
//! - [`RawResponse`] - Unparsed payload with the range it belongs to

pub mod errors;
pub mod fetch;
pub mod models;
pub mod partition;
pub mod provider;

pub use errors::{MarketDataError, RetryClass};
pub use fetch::{
    FetchBatch, FetchEvent, FetchEventSink, FetchOrchestrator, FetchOutcome, FetchState,
    LogEventSink, MockFetchEventSink, NoOpFetchEventSink, RangeFetch, ResilientFetcher,
    RetryPolicy,
};
pub use models::{
    DateRange, Endpoint, InstrumentKind, RawResponse, DEFAULT_GOLD_URL, DEFAULT_RATES_URL,
    GOLD_CODE,
};
pub use partition::{partition, DEFAULT_CHUNK_DAYS, MAX_CHUNK_DAYS};
pub use provider::nbp::NbpClient;
#[cfg(any(test, feature = "test-utils"))]
pub use provider::scripted::ScriptedSource;
pub use provider::JsonSource;
