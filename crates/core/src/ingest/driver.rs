//! Top-level ingestion run: both instrument kinds, concurrently.

use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{error, info};
use serde::Serialize;

use ratekeeper_market_data::{
    FetchEventSink, FetchOrchestrator, InstrumentKind, JsonSource, LogEventSink, ResilientFetcher,
};

use super::config::IngestConfig;
use super::pipeline::{run_pipeline, PipelineReport};
use crate::errors::{Error, Result};
use crate::rates::{RateStore, UpsertSummary};

/// Pipelines of one run, in completion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub pipelines: Vec<PipelineReport>,
}

impl RunReport {
    pub fn pipeline(&self, kind: InstrumentKind) -> Option<&PipelineReport> {
        self.pipelines.iter().find(|p| p.kind == kind)
    }

    pub fn summary(&self) -> UpsertSummary {
        let mut total = UpsertSummary::default();
        for pipeline in &self.pipelines {
            total += pipeline.summary;
        }
        total
    }

    pub fn given_up_ranges(&self) -> usize {
        self.pipelines.iter().map(|p| p.given_up.len()).sum()
    }
}

/// Runs the currency and gold pipelines against one source and one store.
pub struct IngestDriver {
    config: IngestConfig,
    orchestrator: FetchOrchestrator,
    store: Arc<dyn RateStore>,
}

impl IngestDriver {
    pub fn new(config: IngestConfig, source: Arc<dyn JsonSource>, store: Arc<dyn RateStore>) -> Self {
        Self::with_sink(config, source, store, Arc::new(LogEventSink))
    }

    pub fn with_sink(
        config: IngestConfig,
        source: Arc<dyn JsonSource>,
        store: Arc<dyn RateStore>,
        sink: Arc<dyn FetchEventSink>,
    ) -> Self {
        let fetcher = ResilientFetcher::with_sink(source, config.retry, sink);
        Self {
            config,
            orchestrator: FetchOrchestrator::new(fetcher),
            store,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Runs a single pipeline.
    pub async fn run_kind(&self, kind: InstrumentKind) -> Result<PipelineReport> {
        run_pipeline(kind, &self.config, &self.orchestrator, self.store.as_ref()).await
    }

    /// Runs both pipelines concurrently, each committing as soon as it finishes.
    ///
    /// A failed pipeline does not stop the other one. The first failure is
    /// returned once every pipeline has settled.
    pub async fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        info!(
            "Ingestion run: currency from {}, gold from {}, until {} ({}-day chunks)",
            self.config.currency_start,
            self.config.gold_start,
            self.config.end_date,
            self.config.chunk_days
        );

        let mut pending: FuturesUnordered<_> = InstrumentKind::ALL
            .into_iter()
            .map(|kind| async move { (kind, self.run_kind(kind).await) })
            .collect();

        let mut report = RunReport::default();
        let mut first_error: Option<Error> = None;

        while let Some((kind, result)) = pending.next().await {
            match result {
                Ok(pipeline) => {
                    info!(
                        "[{}] finished: {} range(s), {} given up, {} inserted, {} updated",
                        kind,
                        pipeline.ranges,
                        pipeline.given_up.len(),
                        pipeline.summary.inserted,
                        pipeline.summary.updated
                    );
                    report.pipelines.push(pipeline);
                }
                Err(err) => {
                    error!("[{}] pipeline aborted: {}", kind, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                let summary = report.summary();
                info!(
                    "Ingestion run done: {} inserted, {} updated, {} range(s) given up",
                    summary.inserted,
                    summary.updated,
                    report.given_up_ranges()
                );
                Ok(report)
            }
        }
    }
}
