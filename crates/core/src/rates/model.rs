//! Rate domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A normalized bid/ask quote for one instrument on one effective date.
///
/// Gold prices use the code [`GOLD_CODE`](ratekeeper_market_data::GOLD_CODE)
/// with `bid == ask == price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentQuote {
    pub code: String,
    pub effective_date: NaiveDate,
    pub bid: f64,
    pub ask: f64,
}

impl InstrumentQuote {
    pub fn new(code: impl Into<String>, effective_date: NaiveDate, bid: f64, ask: f64) -> Self {
        Self {
            code: code.into(),
            effective_date,
            bid,
            ask,
        }
    }

    /// Composite key `(code, effective_date)` identifying the stored row.
    pub fn key(&self) -> (&str, NaiveDate) {
        (&self.code, self.effective_date)
    }
}

/// A persisted rate row, keyed by `(code, effective_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRate {
    pub code: String,
    pub effective_date: NaiveDate,
    pub bid: f64,
    pub ask: f64,
}

impl From<StoredRate> for InstrumentQuote {
    fn from(rate: StoredRate) -> Self {
        Self {
            code: rate.code,
            effective_date: rate.effective_date,
            bid: rate.bid,
            ask: rate.ask,
        }
    }
}

impl From<&InstrumentQuote> for StoredRate {
    fn from(quote: &InstrumentQuote) -> Self {
        Self {
            code: quote.code.clone(),
            effective_date: quote.effective_date,
            bid: quote.bid,
            ask: quote.ask,
        }
    }
}

/// Row counts of one committed upsert batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertSummary {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

impl std::ops::AddAssign for UpsertSummary {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.updated += other.updated;
    }
}
