//! Settings for one ingestion run.

use chrono::NaiveDate;
use log::debug;

use ratekeeper_market_data::{
    Endpoint, InstrumentKind, RetryPolicy, DEFAULT_CHUNK_DAYS, MAX_CHUNK_DAYS,
};

use crate::errors::ConfigError;

/// Explicit configuration of an ingestion run; there is no ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub currency_start: NaiveDate,
    pub gold_start: NaiveDate,
    pub end_date: NaiveDate,
    pub chunk_days: u32,
    pub retry: RetryPolicy,
    pub rates_endpoint: Endpoint,
    pub gold_endpoint: Endpoint,
}

impl IngestConfig {
    /// Full history of both kinds up to `end_date`, against the public API.
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            currency_start: InstrumentKind::CurrencyRates.history_start(),
            gold_start: InstrumentKind::Gold.history_start(),
            end_date,
            chunk_days: DEFAULT_CHUNK_DAYS,
            retry: RetryPolicy::default(),
            rates_endpoint: Endpoint::nbp(InstrumentKind::CurrencyRates),
            gold_endpoint: Endpoint::nbp(InstrumentKind::Gold),
        }
    }

    /// Moves the start of the run to `start`.
    ///
    /// The currency start never precedes the currency history start. If the
    /// resulting start is past the gold start, gold starts there too.
    pub fn with_start_override(mut self, start: NaiveDate) -> Self {
        let floor = InstrumentKind::CurrencyRates.history_start();
        let start = if start < floor {
            debug!("Start date {} precedes history start {}, clamping", start, floor);
            floor
        } else {
            start
        };

        self.currency_start = start;
        if start > self.gold_start {
            self.gold_start = start;
        }
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn with_chunk_days(mut self, chunk_days: u32) -> Self {
        self.chunk_days = chunk_days;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_endpoints(mut self, rates_url: &str, gold_url: &str) -> Self {
        self.rates_endpoint = Endpoint::new(InstrumentKind::CurrencyRates, rates_url);
        self.gold_endpoint = Endpoint::new(InstrumentKind::Gold, gold_url);
        self
    }

    pub fn start_for(&self, kind: InstrumentKind) -> NaiveDate {
        match kind {
            InstrumentKind::CurrencyRates => self.currency_start,
            InstrumentKind::Gold => self.gold_start,
        }
    }

    pub fn endpoint_for(&self, kind: InstrumentKind) -> &Endpoint {
        match kind {
            InstrumentKind::CurrencyRates => &self.rates_endpoint,
            InstrumentKind::Gold => &self.gold_endpoint,
        }
    }

    /// Checks the chunk width against the source limit and the run bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_days == 0 || self.chunk_days > MAX_CHUNK_DAYS {
            return Err(ConfigError::ChunkSizeOutOfRange {
                value: self.chunk_days,
                max: MAX_CHUNK_DAYS,
            });
        }
        if self.currency_start > self.end_date {
            return Err(ConfigError::StartAfterEnd {
                start: self.currency_start,
                end: self.end_date,
            });
        }
        Ok(())
    }
}
