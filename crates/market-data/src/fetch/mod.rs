//! Resilient, concurrent fetching of date-partitioned payloads.
//!
//! - [`ResilientFetcher`]: one URL, bounded retries with exponential backoff
//! - [`FetchOrchestrator`]: one fetcher call per range, joined concurrently
//! - [`FetchEventSink`]: observability hook for attempts and outcomes

mod fetcher;
mod orchestrator;
mod policy;
mod sink;
mod state;

pub use fetcher::ResilientFetcher;
pub use orchestrator::{FetchBatch, FetchOrchestrator, RangeFetch};
pub use policy::{RetryPolicy, DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS};
pub use sink::{FetchEvent, FetchEventSink, LogEventSink, MockFetchEventSink, NoOpFetchEventSink};
pub use state::{FetchOutcome, FetchState};
