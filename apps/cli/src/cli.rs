//! CLI argument definitions.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ingest` | Fetch currency rates and gold prices and upsert them |
//! | `show` | Print stored rates for one instrument code |

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use ratekeeper_core::utils::parse_date;

/// Ingest NBP exchange rates (table C) and gold prices into SQLite.
#[derive(Debug, Parser)]
#[command(name = "ratekeeper", author, version, about)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch both histories and upsert them into the database.
    Ingest(IngestArgs),

    /// Print stored rates for one code.
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// First day to fetch (YYYY-MM-DD). Never earlier than 2002-01-02.
    #[arg(long, value_parser = parse_date_arg)]
    pub start_date: Option<NaiveDate>,

    /// Last day to fetch (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date_arg)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Instrument code, e.g. USD or GOLD_gold.
    pub code: String,

    /// First day to show (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day to show (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_with_overrides() {
        let cli = Cli::try_parse_from([
            "ratekeeper",
            "ingest",
            "--start-date",
            "2020-01-01",
            "--end-date",
            "2020-12-31",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
                assert_eq!(args.end_date, NaiveDate::from_ymd_opt(2020, 12, 31));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = Cli::try_parse_from(["ratekeeper", "ingest", "--start-date", "01.02.2020"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_show_defaults() {
        let cli = Cli::try_parse_from(["ratekeeper", "show", "USD"]).unwrap();
        match cli.command {
            Command::Show(args) => {
                assert_eq!(args.code, "USD");
                assert!(args.from.is_none());
                assert!(args.to.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
