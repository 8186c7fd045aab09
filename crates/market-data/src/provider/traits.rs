//! Remote source trait definitions.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;

/// A remote service answering GET requests with JSON documents.
///
/// A single call is one attempt: implementations must not retry on their own,
/// the [`ResilientFetcher`](crate::fetch::ResilientFetcher) owns that policy.
///
/// # Errors
///
/// Implementations report failures with the variant that matches the cause:
/// - [`MarketDataError::HttpStatus`] for a non-2xx answer
/// - [`MarketDataError::Timeout`] or [`MarketDataError::Network`] for transport failures
/// - [`MarketDataError::MalformedPayload`] for a body that is not JSON
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// Identifier used in log lines, e.g. "NBP".
    fn id(&self) -> &'static str;

    /// Issue one GET for `url` and parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, MarketDataError>;
}
