//! HTTP client for the public NBP API (api.nbp.pl).
//!
//! Both collections used here (exchange rate table C and gold prices) answer
//! `GET {collection}/{start}/{end}` with a JSON array. Requests for windows
//! longer than 93 days are rejected by the server with HTTP 400.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::provider::JsonSource;

const PROVIDER_ID: &str = "NBP";

/// Default HTTP request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON client for the NBP API.
///
/// # Example
///
/// ```ignore
/// use ratekeeper_market_data::provider::nbp::NbpClient;
///
/// let client = NbpClient::new();
/// let body = client.get_json("https://api.nbp.pl/api/cenyzlota/2024-01-02/2024-01-05").await?;
/// ```
pub struct NbpClient {
    client: Client,
}

impl NbpClient {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn transport_error(url: &str, err: reqwest::Error) -> MarketDataError {
        if err.is_timeout() {
            MarketDataError::Timeout {
                url: url.to_string(),
            }
        } else {
            MarketDataError::Network(err)
        }
    }
}

impl Default for NbpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JsonSource for NbpClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_json(&self, url: &str) -> Result<Value, MarketDataError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Self::transport_error(url, e))?;

        serde_json::from_str(&text).map_err(|e| MarketDataError::MalformedPayload {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
