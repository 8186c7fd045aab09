//! Database model for stored rates.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use ratekeeper_core::constants::DATE_FORMAT;
use ratekeeper_core::rates::{InstrumentQuote, StoredRate};

use crate::errors::StorageError;

/// Database model for `currency_rates`
#[derive(
    Queryable,
    Selectable,
    Insertable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
    PartialEq,
)]
#[diesel(table_name = crate::schema::currency_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct RateDB {
    pub code: String,
    pub effective_date: String,
    pub bid: f64,
    pub ask: f64,
}

impl From<&InstrumentQuote> for RateDB {
    fn from(quote: &InstrumentQuote) -> Self {
        Self {
            code: quote.code.clone(),
            effective_date: quote.effective_date.format(DATE_FORMAT).to_string(),
            bid: quote.bid,
            ask: quote.ask,
        }
    }
}

impl TryFrom<RateDB> for StoredRate {
    type Error = StorageError;

    fn try_from(row: RateDB) -> Result<Self, Self::Error> {
        let effective_date =
            NaiveDate::parse_from_str(&row.effective_date, DATE_FORMAT).map_err(|e| {
                StorageError::InvalidData(format!(
                    "effective_date '{}' for {}: {}",
                    row.effective_date, row.code, e
                ))
            })?;

        Ok(StoredRate {
            code: row.code,
            effective_date,
            bid: row.bid,
            ask: row.ask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_to_row_uses_iso_date() {
        let quote = InstrumentQuote::new("USD", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 3.9, 3.98);
        let row = RateDB::from(&quote);
        assert_eq!(row.effective_date, "2024-01-02");

        let stored = StoredRate::try_from(row).unwrap();
        assert_eq!(InstrumentQuote::from(stored), quote);
    }

    #[test]
    fn test_bad_stored_date_is_reported() {
        let row = RateDB {
            code: "USD".to_string(),
            effective_date: "02.01.2024".to_string(),
            bid: 1.0,
            ask: 1.0,
        };
        assert!(matches!(
            StoredRate::try_from(row),
            Err(StorageError::InvalidData(_))
        ));
    }
}
