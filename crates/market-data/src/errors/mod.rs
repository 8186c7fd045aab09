//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for partitioning and fetching
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while partitioning or fetching market data.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines whether the fetcher should try the same request again.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested interval starts after it ends.
    /// This is a caller bug - retrying won't help.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// The chunk width used to partition an interval is zero.
    #[error("Invalid chunk size: {0} days")]
    InvalidChunkSize(u32),

    /// The remote source answered with a status outside the 2xx class.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The request to the remote source timed out.
    #[error("Timeout: {url}")]
    Timeout {
        /// Requested URL
        url: String,
    },

    /// The response body is not a JSON document.
    #[error("Malformed payload from {url}: {message}")]
    MalformedPayload {
        /// Requested URL
        url: String,
        /// Parser error message
        message: String,
    },

    /// A network error occurred while communicating with the remote source
    /// (connection reset, DNS failure, body read error).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratekeeper_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::HttpStatus { status: 503, url: "https://api.nbp.pl".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::InvalidChunkSize(0);
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::InvalidRange { .. } | Self::InvalidChunkSize(_) => RetryClass::Never,

            Self::HttpStatus { .. }
            | Self::Timeout { .. }
            | Self::MalformedPayload { .. }
            | Self::Network(_) => RetryClass::WithBackoff,
        }
    }

    /// True for failures the fetcher absorbs with retries.
    pub fn is_transient(&self) -> bool {
        self.retry_class() == RetryClass::WithBackoff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_invalid_range_never_retries() {
        let error = MarketDataError::InvalidRange {
            start: date(2024, 2, 1),
            end: date(2024, 1, 1),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(!error.is_transient());
    }

    #[test]
    fn test_http_status_retries_with_backoff() {
        let error = MarketDataError::HttpStatus {
            status: 404,
            url: "https://api.nbp.pl/api/cenyzlota/2024-01-01/2024-01-01".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    }

    #[test]
    fn test_malformed_payload_retries_with_backoff() {
        let error = MarketDataError::MalformedPayload {
            url: "u".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert!(error.is_transient());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::InvalidRange {
            start: date(2024, 2, 1),
            end: date(2024, 1, 1),
        };
        assert_eq!(
            format!("{}", error),
            "Invalid date range: 2024-02-01 is after 2024-01-01"
        );

        let error = MarketDataError::HttpStatus {
            status: 500,
            url: "https://api.nbp.pl/x".to_string(),
        };
        assert_eq!(format!("{}", error), "HTTP 500 from https://api.nbp.pl/x");
    }
}
