use std::str::FromStr;
use std::time::Duration;

use ratekeeper_core::constants::DEFAULT_DB_PATH;
use ratekeeper_core::errors::ConfigError;
use ratekeeper_market_data::{
    RetryPolicy, DEFAULT_CHUNK_DAYS, DEFAULT_GOLD_URL, DEFAULT_RATES_URL,
};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_MS: u64 = 1_000;
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `RK_DB_PATH`; defaults to `currency_rates.db` in the working directory,
    /// so an existing database from earlier tooling is picked up.
    pub db_path: String,
    pub rates_url: String,
    pub gold_url: String,
    pub chunk_days: u32,
    pub max_attempts: u32,
    pub backoff: Duration,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `RK_*` variables, loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let log_format = match lookup("RK_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "RK_LOG_FORMAT".to_string(),
                    value: other.to_string(),
                    reason: "expected 'text' or 'json'".to_string(),
                })
            }
        };

        Ok(Self {
            db_path: text("RK_DB_PATH", DEFAULT_DB_PATH),
            rates_url: text("RK_RATES_URL", DEFAULT_RATES_URL),
            gold_url: text("RK_GOLD_URL", DEFAULT_GOLD_URL),
            chunk_days: parse_var(&lookup, "RK_CHUNK_DAYS", DEFAULT_CHUNK_DAYS)?,
            max_attempts: parse_var(&lookup, "RK_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            backoff: Duration::from_millis(parse_var(&lookup, "RK_BACKOFF_MS", DEFAULT_BACKOFF_MS)?),
            http_timeout: Duration::from_millis(parse_var(
                &lookup,
                "RK_HTTP_TIMEOUT_MS",
                DEFAULT_HTTP_TIMEOUT_MS,
            )?),
            log_format,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}
