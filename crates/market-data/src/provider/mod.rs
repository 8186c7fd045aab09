//! Remote source abstractions and implementations.
//!
//! - The `JsonSource` trait: one GET, one JSON document, no retries
//! - `nbp`: the reqwest-backed client for api.nbp.pl
//! - `scripted`: an in-memory source for tests (`test-utils` feature)

mod traits;

pub mod nbp;
#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub use traits::JsonSource;
