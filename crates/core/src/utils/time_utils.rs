use chrono::{Local, NaiveDate};

use crate::constants::DATE_FORMAT;
use crate::errors::ValidationError;

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| {
        ValidationError::DateParse {
            value: value.to_string(),
            source,
        }
    })
}

/// Today's date on the local clock; the default end of an ingestion run.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
