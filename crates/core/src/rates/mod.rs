//! Rates module - normalized quotes, payload parsing and the storage contract.

mod model;
mod normalize;
mod store;

pub use model::{InstrumentQuote, StoredRate, UpsertSummary};
pub use normalize::{normalize, Normalized, ParseError};
pub use store::RateStore;
