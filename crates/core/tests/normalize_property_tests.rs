//! Property-based tests for payload normalization.
//!
//! These tests verify that the key-collapse properties hold across randomly
//! generated table C payloads, using the `proptest` crate.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use ratekeeper_core::rates::normalize;
use ratekeeper_market_data::{DateRange, InstrumentKind, RawResponse};
use serde_json::{json, Value};

// =============================================================================
// Generators
// =============================================================================

/// Generates a currency code from a small alphabet so duplicates are common.
fn arb_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("CHF".to_string()),
        Just("GBP".to_string()),
    ]
}

/// Generates one rate table: day offset plus `(code, bid, ask)` entries.
fn arb_table() -> impl Strategy<Value = (u32, Vec<(String, f64, f64)>)> {
    (
        0u32..5,
        prop::collection::vec((arb_code(), 0.0f64..10.0, 0.0f64..10.0), 0..8),
    )
}

fn table_json(day: u32, rates: &[(String, f64, f64)]) -> Value {
    json!({
        "table": "C",
        "effectiveDate": format!("2024-01-{:02}", day + 1),
        "rates": rates
            .iter()
            .map(|(code, bid, ask)| json!({"code": code, "bid": bid, "ask": ask}))
            .collect::<Vec<_>>(),
    })
}

fn response(body: Value) -> RawResponse {
    RawResponse {
        range: DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap(),
        url: "http://nbp.test/c".to_string(),
        body,
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// At most one quote per (code, date) survives, in (date, code) order.
    #[test]
    fn prop_keys_are_unique_and_ordered(tables in prop::collection::vec(arb_table(), 0..6)) {
        let body = Value::Array(tables.iter().map(|(day, rates)| table_json(*day, rates)).collect());
        let normalized = normalize(&[response(body)], InstrumentKind::CurrencyRates);

        for pair in normalized.quotes.windows(2) {
            let a = (pair[0].effective_date, &pair[0].code);
            let b = (pair[1].effective_date, &pair[1].code);
            prop_assert!(a < b, "quotes out of order or duplicated: {:?} then {:?}", a, b);
        }
    }

    /// The surviving quote of every key carries the last-seen values.
    #[test]
    fn prop_last_seen_value_wins(tables in prop::collection::vec(arb_table(), 1..6)) {
        let mut expected: HashMap<(u32, String), (f64, f64)> = HashMap::new();
        for (day, rates) in &tables {
            for (code, bid, ask) in rates {
                expected.insert((*day, code.clone()), (*bid, *ask));
            }
        }

        let body = Value::Array(tables.iter().map(|(day, rates)| table_json(*day, rates)).collect());
        let normalized = normalize(&[response(body)], InstrumentKind::CurrencyRates);

        prop_assert_eq!(normalized.quotes.len(), expected.len());
        prop_assert_eq!(normalized.skipped, 0);
        let total_entries: usize = tables.iter().map(|(_, rates)| rates.len()).sum();
        prop_assert_eq!(normalized.duplicates, total_entries - expected.len());

        for quote in &normalized.quotes {
            let day = quote.effective_date.format("%d").to_string().parse::<u32>().unwrap() - 1;
            let (bid, ask) = expected[&(day, quote.code.clone())];
            prop_assert_eq!(quote.bid, bid);
            prop_assert_eq!(quote.ask, ask);
        }
    }
}
