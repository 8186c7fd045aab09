//! Command handlers behind the `ratekeeper` subcommands.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use ratekeeper_core::ingest::{IngestConfig, IngestDriver, RunReport};
use ratekeeper_core::rates::{RateStore, StoredRate};
use ratekeeper_core::utils::today;
use ratekeeper_market_data::{InstrumentKind, NbpClient};
use ratekeeper_storage_sqlite::{create_pool, init, run_migrations, spawn_writer, RateRepository};

use crate::cli::{IngestArgs, ShowArgs};
use crate::config::Config;

/// Opens (creating if needed) the database and starts its writer.
pub fn open_store(db_path: &str) -> anyhow::Result<Arc<RateRepository>> {
    let db_path = init(db_path).with_context(|| format!("failed to open database {}", db_path))?;
    let pool = create_pool(&db_path)?;
    run_migrations(&pool).context("failed to apply migrations")?;
    let writer = spawn_writer((*pool).clone());
    Ok(Arc::new(RateRepository::new(pool, writer)))
}

pub fn ingest_config(config: &Config, args: &IngestArgs) -> IngestConfig {
    let mut ingest = IngestConfig::new(args.end_date.unwrap_or_else(today))
        .with_chunk_days(config.chunk_days)
        .with_retry(config.retry_policy())
        .with_endpoints(&config.rates_url, &config.gold_url);
    if let Some(start) = args.start_date {
        ingest = ingest.with_start_override(start);
    }
    ingest
}

pub async fn ingest(config: &Config, args: IngestArgs) -> anyhow::Result<()> {
    let ingest = ingest_config(config, &args);
    ingest.validate()?;

    info!(
        "Ingesting {}..{} into {}",
        ingest.start_for(InstrumentKind::CurrencyRates),
        ingest.end_date,
        config.db_path
    );

    let store = open_store(&config.db_path)?;
    let source = Arc::new(NbpClient::with_timeout(config.http_timeout));
    let report = IngestDriver::new(ingest, source, store).run().await?;

    print!("{}", render_report(&report));
    if report.given_up_ranges() > 0 {
        warn!(
            "{} range(s) were not fetched; re-run over the same dates to fill them",
            report.given_up_ranges()
        );
    }
    Ok(())
}

pub fn show(config: &Config, args: ShowArgs) -> anyhow::Result<()> {
    let from = args
        .from
        .unwrap_or_else(|| InstrumentKind::CurrencyRates.history_start());
    let to = args.to.unwrap_or_else(today);

    let store = open_store(&config.db_path)?;
    let rates = store.get_rates_in_range(&args.code, from, to)?;
    if rates.is_empty() {
        println!("No rates stored for {} between {} and {}", args.code, from, to);
    } else {
        print!("{}", render_rates(&rates));
    }
    Ok(())
}

fn render_report(report: &RunReport) -> String {
    let mut out = String::new();
    for pipeline in &report.pipelines {
        let _ = writeln!(
            out,
            "{:<15} ranges={} fetched={} dropped={} quotes={} skipped={} inserted={} updated={}",
            pipeline.kind.as_str(),
            pipeline.ranges,
            pipeline.fetched,
            pipeline.given_up.len(),
            pipeline.quotes,
            pipeline.skipped_records,
            pipeline.summary.inserted,
            pipeline.summary.updated,
        );
    }
    let total = report.summary();
    let _ = writeln!(
        out,
        "total           inserted={} updated={}",
        total.inserted, total.updated
    );
    out
}

fn render_rates(rates: &[StoredRate]) -> String {
    let mut out = format!("{:<12} {:<10} {:>10} {:>10}\n", "CODE", "DATE", "BID", "ASK");
    for rate in rates {
        let _ = writeln!(
            out,
            "{:<12} {:<10} {:>10.4} {:>10.4}",
            rate.code, rate.effective_date, rate.bid, rate.ask
        );
    }
    out
}
