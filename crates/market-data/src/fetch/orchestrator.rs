//! Concurrent fan-out of range fetches for one endpoint.

use futures::future::join_all;
use log::{info, warn};

use crate::models::{DateRange, Endpoint, InstrumentKind, RawResponse};

use super::fetcher::ResilientFetcher;
use super::state::FetchOutcome;

/// Outcome of fetching one sub-range.
#[derive(Clone, Debug)]
pub struct RangeFetch {
    pub range: DateRange,
    pub url: String,
    pub outcome: FetchOutcome,
}

/// All range outcomes of one endpoint, in partition order.
#[derive(Clone, Debug)]
pub struct FetchBatch {
    pub kind: InstrumentKind,
    pub fetches: Vec<RangeFetch>,
}

impl FetchBatch {
    pub fn fetched_count(&self) -> usize {
        self.fetches
            .iter()
            .filter(|f| f.outcome.is_fetched())
            .count()
    }

    pub fn given_up_count(&self) -> usize {
        self.fetches.len() - self.fetched_count()
    }

    /// Ranges that produced no payload in this run.
    pub fn given_up_ranges(&self) -> Vec<DateRange> {
        self.fetches
            .iter()
            .filter(|f| !f.outcome.is_fetched())
            .map(|f| f.range)
            .collect()
    }

    /// Successful payloads only; given-up ranges are dropped.
    pub fn into_responses(self) -> Vec<RawResponse> {
        self.fetches
            .into_iter()
            .filter_map(|fetch| {
                let RangeFetch {
                    range,
                    url,
                    outcome,
                } = fetch;
                outcome
                    .into_body()
                    .map(|body| RawResponse { range, url, body })
            })
            .collect()
    }
}

/// Runs one [`ResilientFetcher`] call per range, all on the current task.
#[derive(Clone)]
pub struct FetchOrchestrator {
    fetcher: ResilientFetcher,
}

impl FetchOrchestrator {
    pub fn new(fetcher: ResilientFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &ResilientFetcher {
        &self.fetcher
    }

    /// Fetch every range concurrently and wait until all of them settled.
    ///
    /// Individual failures never fail the batch; they show up as
    /// [`FetchOutcome::GivenUp`] entries.
    pub async fn fetch_all(&self, ranges: &[DateRange], endpoint: &Endpoint) -> FetchBatch {
        let fetcher = &self.fetcher;
        let requests = ranges.iter().map(|range| {
            let url = endpoint.url_for(range);
            async move {
                let outcome = fetcher.fetch(&url).await;
                RangeFetch {
                    range: *range,
                    url,
                    outcome,
                }
            }
        });

        let batch = FetchBatch {
            kind: endpoint.kind,
            fetches: join_all(requests).await,
        };

        let given_up = batch.given_up_count();
        if given_up > 0 {
            warn!(
                "{} fetch from {}: {} of {} range(s) given up",
                endpoint.kind,
                fetcher.source_id(),
                given_up,
                batch.fetches.len()
            );
        } else {
            info!(
                "{} fetch from {}: all {} range(s) fetched",
                endpoint.kind,
                fetcher.source_id(),
                batch.fetches.len()
            );
        }

        batch
    }
}
