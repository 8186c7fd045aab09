//! One instrument kind taken through partition, fetch, normalize and upsert.

use log::{info, warn};
use serde::Serialize;

use ratekeeper_market_data::{partition, DateRange, FetchOrchestrator, InstrumentKind};

use super::config::IngestConfig;
use super::stage::IngestStage;
use crate::errors::Result;
use crate::rates::{normalize, RateStore, UpsertSummary};

/// What one pipeline did during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub kind: InstrumentKind,
    pub ranges: usize,
    pub fetched: usize,
    /// Ranges with no payload this run; a later run over them fills the gap.
    pub given_up: Vec<DateRange>,
    pub quotes: usize,
    pub skipped_records: usize,
    pub dropped_responses: usize,
    pub summary: UpsertSummary,
    pub stage: IngestStage,
}

impl PipelineReport {
    fn empty(kind: InstrumentKind) -> Self {
        Self {
            kind,
            ranges: 0,
            fetched: 0,
            given_up: Vec::new(),
            quotes: 0,
            skipped_records: 0,
            dropped_responses: 0,
            summary: UpsertSummary::default(),
            stage: IngestStage::Partitioning,
        }
    }
}

/// Stage bookkeeping with one log line per transition.
struct StageTracker {
    kind: InstrumentKind,
    stage: IngestStage,
}

impl StageTracker {
    fn new(kind: InstrumentKind) -> Self {
        info!("[{}] stage: {}", kind, IngestStage::Partitioning);
        Self {
            kind,
            stage: IngestStage::Partitioning,
        }
    }

    fn advance(&mut self) -> IngestStage {
        if let Some(next) = self.stage.next() {
            info!("[{}] stage: {} -> {}", self.kind, self.stage, next);
            self.stage = next;
        }
        self.stage
    }
}

/// Runs the pipeline for `kind`.
///
/// Ranges that could not be fetched are reported, not raised. An invalid
/// config, partition and persistence failures abort the pipeline with an error.
/// A kind whose history starts after a valid end date is skipped.
pub async fn run_pipeline(
    kind: InstrumentKind,
    config: &IngestConfig,
    orchestrator: &FetchOrchestrator,
    store: &dyn RateStore,
) -> Result<PipelineReport> {
    config.validate()?;

    let mut report = PipelineReport::empty(kind);
    let mut tracker = StageTracker::new(kind);

    let start = config.start_for(kind);
    if start > config.end_date {
        info!(
            "[{}] start {} is after end {}, nothing to ingest",
            kind, start, config.end_date
        );
        while tracker.stage != IngestStage::Done {
            tracker.advance();
        }
        report.stage = tracker.stage;
        return Ok(report);
    }

    let ranges = partition(start, config.end_date, config.chunk_days)?;
    report.ranges = ranges.len();

    tracker.advance();
    let batch = orchestrator
        .fetch_all(&ranges, config.endpoint_for(kind))
        .await;
    report.fetched = batch.fetched_count();
    report.given_up = batch.given_up_ranges();
    if !report.given_up.is_empty() {
        warn!(
            "[{}] {} range(s) dropped for this run: {}",
            kind,
            report.given_up.len(),
            report
                .given_up
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    tracker.advance();
    let normalized = normalize(&batch.into_responses(), kind);
    report.quotes = normalized.quotes.len();
    report.skipped_records = normalized.skipped;
    report.dropped_responses = normalized.dropped_responses;
    if normalized.skipped > 0 {
        warn!("[{}] skipped {} malformed record(s)", kind, normalized.skipped);
    }

    tracker.advance();
    if !normalized.quotes.is_empty() {
        report.summary = store.upsert_batch(&normalized.quotes).await?;
    }
    info!(
        "[{}] upserted {} quote(s): {} inserted, {} updated",
        kind, report.quotes, report.summary.inserted, report.summary.updated
    );

    report.stage = tracker.advance();
    Ok(report)
}
