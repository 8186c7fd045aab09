//! Mapping of raw NBP payloads onto [`InstrumentQuote`]s.
//!
//! Two payload shapes are understood:
//!
//! ```text
//! table C:  [{"table":"C","no":"001/C/NBP/2024","effectiveDate":"2024-01-02",
//!             "rates":[{"currency":"dolar amerykański","code":"USD","bid":3.9,"ask":3.98}]}]
//! gold:     [{"data":"2024-01-02","cena":257.1}]
//! ```
//!
//! A single table object (not wrapped in an array) is accepted for table C.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use ratekeeper_market_data::{InstrumentKind, RawResponse, GOLD_CODE};

use super::model::InstrumentQuote;
use crate::constants::DATE_FORMAT;

/// Why a single record was rejected.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid {field} value {value}")]
    InvalidPrice { field: &'static str, value: f64 },

    #[error("Empty instrument code")]
    EmptyCode,

    #[error("Table without effectiveDate or rates: {0}")]
    MalformedTable(String),

    #[error("Unexpected payload shape: expected {expected}")]
    UnexpectedShape { expected: &'static str },
}

/// Result of normalizing one batch of responses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// One quote per `(code, effective_date)`, ordered by date then code.
    pub quotes: Vec<InstrumentQuote>,
    /// Records rejected individually.
    pub skipped: usize,
    /// Responses whose top-level shape could not be read at all.
    pub dropped_responses: usize,
    /// Records replaced by a later record with the same key.
    pub duplicates: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateTable {
    effective_date: Option<String>,
    rates: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RateEntry {
    code: String,
    bid: f64,
    ask: f64,
}

#[derive(Debug, Deserialize)]
struct GoldEntry {
    #[serde(alias = "data")]
    date: String,
    #[serde(alias = "cena")]
    price: f64,
}

/// Accumulates quotes in key order; later records overwrite earlier ones.
#[derive(Default)]
struct Collector {
    by_key: BTreeMap<(NaiveDate, String), InstrumentQuote>,
    skipped: usize,
    duplicates: usize,
}

impl Collector {
    fn push(&mut self, quote: InstrumentQuote) {
        let key = (quote.effective_date, quote.code.clone());
        if self.by_key.insert(key, quote).is_some() {
            self.duplicates += 1;
        }
    }

    fn skip(&mut self, response: &RawResponse, err: &ParseError) {
        self.skipped += 1;
        warn!("Skipping record from {} ({}): {}", response.range, response.url, err);
    }
}

/// Parses every response of one instrument kind into deduplicated quotes.
pub fn normalize(responses: &[RawResponse], kind: InstrumentKind) -> Normalized {
    let mut collector = Collector::default();
    let mut dropped_responses = 0;

    for response in responses {
        let result = match kind {
            InstrumentKind::CurrencyRates => collect_rate_tables(response, &mut collector),
            InstrumentKind::Gold => collect_gold_prices(response, &mut collector),
        };
        if let Err(err) = result {
            dropped_responses += 1;
            warn!(
                "Dropping {} response for {} ({}): {}",
                kind, response.range, response.url, err
            );
        }
    }

    let normalized = Normalized {
        quotes: collector.by_key.into_values().collect(),
        skipped: collector.skipped,
        dropped_responses,
        duplicates: collector.duplicates,
    };

    debug!(
        "Normalized {} {} response(s): {} quote(s), {} skipped, {} duplicate(s), {} dropped",
        responses.len(),
        kind,
        normalized.quotes.len(),
        normalized.skipped,
        normalized.duplicates,
        normalized.dropped_responses
    );

    normalized
}

fn collect_rate_tables(
    response: &RawResponse,
    collector: &mut Collector,
) -> Result<(), ParseError> {
    let tables: Vec<&Value> = match &response.body {
        Value::Array(items) => items.iter().collect(),
        table @ Value::Object(_) => vec![table],
        _ => {
            return Err(ParseError::UnexpectedShape {
                expected: "an array of rate tables or a rate table",
            })
        }
    };

    for value in tables {
        let table = match RateTable::deserialize(value) {
            Ok(table) => table,
            Err(err) => {
                collector.skip(response, &ParseError::MalformedTable(err.to_string()));
                continue;
            }
        };

        let effective_date = match table.effective_date.as_deref().map(parse_date) {
            Some(Ok(date)) => date,
            Some(Err(err)) => {
                for _ in &table.rates {
                    collector.skip(response, &err);
                }
                continue;
            }
            None => {
                let err = ParseError::MalformedTable("missing effectiveDate".to_string());
                for _ in &table.rates {
                    collector.skip(response, &err);
                }
                continue;
            }
        };

        for rate in table.rates {
            match parse_rate(rate, effective_date) {
                Ok(quote) => collector.push(quote),
                Err(err) => collector.skip(response, &err),
            }
        }
    }

    Ok(())
}

fn collect_gold_prices(
    response: &RawResponse,
    collector: &mut Collector,
) -> Result<(), ParseError> {
    let records = match &response.body {
        Value::Array(items) => items,
        _ => {
            return Err(ParseError::UnexpectedShape {
                expected: "an array of gold prices",
            })
        }
    };

    for record in records {
        match parse_gold(record) {
            Ok(quote) => collector.push(quote),
            Err(err) => collector.skip(response, &err),
        }
    }

    Ok(())
}

fn parse_rate(value: Value, effective_date: NaiveDate) -> Result<InstrumentQuote, ParseError> {
    let entry = RateEntry::deserialize(value)?;
    let code = entry.code.trim();
    if code.is_empty() {
        return Err(ParseError::EmptyCode);
    }
    Ok(InstrumentQuote::new(
        code,
        effective_date,
        check_price("bid", entry.bid)?,
        check_price("ask", entry.ask)?,
    ))
}

fn parse_gold(value: &Value) -> Result<InstrumentQuote, ParseError> {
    let entry = GoldEntry::deserialize(value)?;
    let date = parse_date(&entry.date)?;
    let price = check_price("price", entry.price)?;
    Ok(InstrumentQuote::new(GOLD_CODE, date, price, price))
}

fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(value.to_string()))
}

fn check_price(field: &'static str, value: f64) -> Result<f64, ParseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParseError::InvalidPrice { field, value })
    }
}
