//! In-memory [`JsonSource`] for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::provider::JsonSource;

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<Result<Value, MarketDataError>>>,
    fixed: HashMap<String, Value>,
    calls: HashMap<String, usize>,
}

/// Source answering from per-URL scripts.
///
/// Queued answers are consumed in order; once a URL's queue is empty its fixed
/// answer is served, and URLs with neither answer HTTP 404.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one successful answer for `url`.
    pub fn push_ok(&self, url: impl Into<String>, body: Value) -> &Self {
        self.push(url.into(), Ok(body))
    }

    /// Queue one failed answer for `url`.
    pub fn push_err(&self, url: impl Into<String>, error: MarketDataError) -> &Self {
        self.push(url.into(), Err(error))
    }

    /// Answer `url` with `body` whenever nothing is queued for it.
    pub fn always(&self, url: impl Into<String>, body: Value) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.fixed.insert(url.into(), body);
        }
        self
    }

    /// Number of requests made for `url`.
    pub fn calls(&self, url: &str) -> usize {
        self.script
            .lock()
            .map(|s| s.calls.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Number of requests made for any URL.
    pub fn total_calls(&self) -> usize {
        self.script
            .lock()
            .map(|s| s.calls.values().sum())
            .unwrap_or(0)
    }

    fn push(&self, url: String, answer: Result<Value, MarketDataError>) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.queued.entry(url).or_default().push_back(answer);
        }
        self
    }
}

#[async_trait]
impl JsonSource for ScriptedSource {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    async fn get_json(&self, url: &str) -> Result<Value, MarketDataError> {
        let mut script = self.script.lock().map_err(|_| MarketDataError::HttpStatus {
            status: 500,
            url: url.to_string(),
        })?;
        *script.calls.entry(url.to_string()).or_default() += 1;

        if let Some(answer) = script.queued.get_mut(url).and_then(VecDeque::pop_front) {
            return answer;
        }
        script
            .fixed
            .get(url)
            .cloned()
            .ok_or_else(|| MarketDataError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}
