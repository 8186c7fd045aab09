//! Market data models
//!
//! - `date_range` - Inclusive request interval (DateRange)
//! - `instrument` - Instrument families and their NBP defaults (InstrumentKind)
//! - `endpoint` - Remote collection addressing (Endpoint)
//! - `response` - Unparsed per-range payloads (RawResponse)

mod date_range;
mod endpoint;
mod instrument;
mod response;

pub use date_range::DateRange;
pub use endpoint::Endpoint;
pub use instrument::{InstrumentKind, DEFAULT_GOLD_URL, DEFAULT_RATES_URL, GOLD_CODE};
pub use response::RawResponse;
