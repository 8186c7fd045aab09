//! Single-URL fetch with bounded retry and exponential backoff.

use std::sync::Arc;

use crate::provider::JsonSource;

use super::policy::RetryPolicy;
use super::sink::{FetchEvent, FetchEventSink, LogEventSink};
use super::state::{FetchOutcome, FetchState};

/// Fetches one URL, absorbing transient failures.
///
/// Every failure of the source (non-2xx status, transport error, body that is
/// not JSON) is retried until the policy's attempt budget is spent. After
/// failed attempt `k` (0-indexed) the fetcher sleeps `2^k` backoff units; no
/// sleep follows the final attempt. Exhaustion yields
/// [`FetchOutcome::GivenUp`] instead of an error.
#[derive(Clone)]
pub struct ResilientFetcher {
    source: Arc<dyn JsonSource>,
    policy: RetryPolicy,
    sink: Arc<dyn FetchEventSink>,
}

impl ResilientFetcher {
    pub fn new(source: Arc<dyn JsonSource>, policy: RetryPolicy) -> Self {
        Self::with_sink(source, policy, Arc::new(LogEventSink))
    }

    pub fn with_sink(
        source: Arc<dyn JsonSource>,
        policy: RetryPolicy,
        sink: Arc<dyn FetchEventSink>,
    ) -> Self {
        Self {
            source,
            policy,
            sink,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn source_id(&self) -> &'static str {
        self.source.id()
    }

    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let mut state = FetchState::Pending;
        loop {
            state = match state.into_outcome() {
                Ok(outcome) => return outcome,
                Err(in_flight) => self.step(url, in_flight).await,
            };
        }
    }

    /// Make one attempt from a non-terminal state and return the next state.
    pub async fn step(&self, url: &str, state: FetchState) -> FetchState {
        if state.is_terminal() {
            return state;
        }

        let max_attempts = self.policy.attempts();
        let failed = state.failed_attempts();
        let attempt = failed + 1;

        self.sink.emit(FetchEvent::Attempt {
            url: url.to_string(),
            attempt,
            max_attempts,
        });

        match self.source.get_json(url).await {
            Ok(body) => {
                self.sink.emit(FetchEvent::Fetched {
                    url: url.to_string(),
                    attempts: attempt,
                });
                FetchState::Fetched {
                    attempts: attempt,
                    body,
                }
            }
            Err(err) => {
                let last_error = err.to_string();
                if err.is_transient() && attempt < max_attempts {
                    let delay = self.policy.delay_after(failed);
                    self.sink.emit(FetchEvent::AttemptFailed {
                        url: url.to_string(),
                        attempt,
                        error: last_error.clone(),
                        retry_in: Some(delay),
                    });
                    tokio::time::sleep(delay).await;
                    FetchState::Retrying {
                        failed_attempts: attempt,
                        last_error,
                    }
                } else {
                    self.sink.emit(FetchEvent::AttemptFailed {
                        url: url.to_string(),
                        attempt,
                        error: last_error.clone(),
                        retry_in: None,
                    });
                    self.sink.emit(FetchEvent::GivenUp {
                        url: url.to_string(),
                        attempts: attempt,
                        last_error: last_error.clone(),
                    });
                    FetchState::GivenUp {
                        attempts: attempt,
                        last_error,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MarketDataError;
    use crate::fetch::MockFetchEventSink;
    use crate::provider::scripted::ScriptedSource;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    const URL: &str = "https://api.nbp.pl/api/cenyzlota/2024-01-02/2024-01-05";

    fn server_error() -> MarketDataError {
        MarketDataError::HttpStatus {
            status: 503,
            url: URL.to_string(),
        }
    }

    fn fetcher(source: &ScriptedSource, sink: &MockFetchEventSink) -> ResilientFetcher {
        ResilientFetcher::with_sink(
            Arc::new(source.clone()),
            RetryPolicy::default(),
            Arc::new(sink.clone()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_first_try_without_waiting() {
        let source = ScriptedSource::new();
        source.push_ok(URL, json!([{"data": "2024-01-02", "cena": 257.1}]));
        let sink = MockFetchEventSink::new();

        let started = Instant::now();
        let outcome = fetcher(&source, &sink).fetch(URL).await;

        assert!(outcome.is_fetched());
        assert_eq!(source.calls(URL), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(
            sink.events().last(),
            Some(&FetchEvent::Fetched {
                url: URL.to_string(),
                attempts: 1,
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds() {
        let source = ScriptedSource::new();
        source
            .push_err(URL, server_error())
            .push_err(
                URL,
                MarketDataError::MalformedPayload {
                    url: URL.to_string(),
                    message: "expected value".to_string(),
                },
            )
            .push_ok(URL, json!({"ok": true}));
        let sink = MockFetchEventSink::new();

        let started = Instant::now();
        let outcome = fetcher(&source, &sink).fetch(URL).await;

        assert_eq!(outcome, FetchOutcome::Fetched(json!({"ok": true})));
        assert_eq!(source.calls(URL), 3);
        // 1 unit after the first failure, 2 after the second
        assert_eq!(started.elapsed(), Duration::from_secs(3));

        let retries: Vec<Option<Duration>> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                FetchEvent::AttemptFailed { retry_in, .. } => Some(retry_in),
                _ => None,
            })
            .collect();
        assert_eq!(
            retries,
            vec![Some(Duration::from_secs(1)), Some(Duration::from_secs(2))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let source = ScriptedSource::new();
        for _ in 0..5 {
            source.push_err(URL, server_error());
        }
        let sink = MockFetchEventSink::new();

        let started = Instant::now();
        let outcome = fetcher(&source, &sink).fetch(URL).await;

        match outcome {
            FetchOutcome::GivenUp {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"));
            }
            other => panic!("expected GivenUp, got {:?}", other),
        }
        assert_eq!(source.calls(URL), 3);
        // no wait after the final attempt
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(matches!(
            sink.events().last(),
            Some(FetchEvent::GivenUp { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_retried_like_any_other_status() {
        let source = ScriptedSource::new();
        let sink = MockFetchEventSink::new();
        let fetcher = ResilientFetcher::with_sink(
            Arc::new(source.clone()),
            RetryPolicy::new(2, Duration::from_millis(10)),
            Arc::new(sink.clone()),
        );

        let outcome = fetcher.fetch(URL).await;

        assert!(!outcome.is_fetched());
        assert_eq!(source.calls(URL), 2);
        assert!(outcome.into_body().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_walks_the_state_machine() {
        let source = ScriptedSource::new();
        source
            .push_err(URL, server_error())
            .push_ok(URL, json!([]));
        let sink = MockFetchEventSink::new();
        let fetcher = fetcher(&source, &sink);

        let state = fetcher.step(URL, FetchState::Pending).await;
        assert!(matches!(
            state,
            FetchState::Retrying {
                failed_attempts: 1,
                ..
            }
        ));

        let state = fetcher.step(URL, state).await;
        assert_eq!(
            state,
            FetchState::Fetched {
                attempts: 2,
                body: json!([]),
            }
        );

        // terminal states are left untouched
        let state = fetcher.step(URL, state).await;
        assert!(state.is_terminal());
        assert_eq!(source.calls(URL), 2);
    }
}
