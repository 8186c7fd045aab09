//! Fetch event sink trait and implementations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, warn};

/// Something that happened while fetching one URL.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchEvent {
    Attempt {
        url: String,
        attempt: u32,
        max_attempts: u32,
    },
    AttemptFailed {
        url: String,
        attempt: u32,
        error: String,
        /// `None` when no further attempt follows.
        retry_in: Option<Duration>,
    },
    Fetched {
        url: String,
        attempts: u32,
    },
    GivenUp {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

impl FetchEvent {
    pub fn url(&self) -> &str {
        match self {
            Self::Attempt { url, .. }
            | Self::AttemptFailed { url, .. }
            | Self::Fetched { url, .. }
            | Self::GivenUp { url, .. } => url,
        }
    }
}

/// Receives fetch events from the [`ResilientFetcher`](super::ResilientFetcher).
///
/// `emit()` is called inline on the fetch path and must not block.
pub trait FetchEventSink: Send + Sync {
    fn emit(&self, event: FetchEvent);
}

/// Default sink: one log line per event, keyed by URL.
#[derive(Clone, Default)]
pub struct LogEventSink;

impl FetchEventSink for LogEventSink {
    fn emit(&self, event: FetchEvent) {
        match event {
            FetchEvent::Attempt {
                url,
                attempt,
                max_attempts,
            } => debug!("GET {} (attempt {}/{})", url, attempt, max_attempts),
            FetchEvent::AttemptFailed {
                url,
                attempt,
                error,
                retry_in: Some(delay),
            } => warn!(
                "Attempt {} for {} failed: {}. Retrying in {:?}",
                attempt, url, error, delay
            ),
            FetchEvent::AttemptFailed {
                url,
                attempt,
                error,
                retry_in: None,
            } => warn!("Attempt {} for {} failed: {}", attempt, url, error),
            FetchEvent::Fetched { url, attempts } => {
                debug!("Fetched {} after {} attempt(s)", url, attempts)
            }
            FetchEvent::GivenUp {
                url,
                attempts,
                last_error,
            } => error!(
                "Giving up on {} after {} attempt(s): {}",
                url, attempts, last_error
            ),
        }
    }
}

/// No-op implementation for contexts that don't need fetch events.
#[derive(Clone, Default)]
pub struct NoOpFetchEventSink;

impl FetchEventSink for NoOpFetchEventSink {
    fn emit(&self, _event: FetchEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockFetchEventSink {
    events: Arc<Mutex<Vec<FetchEvent>>>,
}

impl MockFetchEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Returns the collected events for one URL.
    pub fn events_for(&self, url: &str) -> Vec<FetchEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.url() == url)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FetchEventSink for MockFetchEventSink {
    fn emit(&self, event: FetchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
