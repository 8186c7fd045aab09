use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, info};
use std::sync::Arc;

use super::model::RateDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::currency_rates::dsl as rates_dsl;
use crate::utils::chunk_for_sqlite;
use ratekeeper_core::constants::DATE_FORMAT;
use ratekeeper_core::rates::{InstrumentQuote, RateStore, StoredRate, UpsertSummary};
use ratekeeper_core::Result;

pub struct RateRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl RateRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Number of stored rows, optionally for one code.
    pub fn count(&self, code: Option<&str>) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = rates_dsl::currency_rates.count().into_boxed();
        if let Some(code) = code {
            query = query.filter(rates_dsl::code.eq(code.to_string()));
        }
        query.get_result::<i64>(&mut conn).into_core()
    }

    /// Distinct instrument codes present in the store, sorted.
    pub fn list_codes(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        rates_dsl::currency_rates
            .select(rates_dsl::code)
            .distinct()
            .order(rates_dsl::code.asc())
            .load::<String>(&mut conn)
            .into_core()
    }
}

fn insert_rows(conn: &mut SqliteConnection, rows: &[RateDB]) -> Result<usize> {
    let mut inserted = 0;
    for chunk in chunk_for_sqlite(rows) {
        inserted += diesel::insert_into(rates_dsl::currency_rates)
            .values(chunk)
            .execute(conn)
            .map_err(StorageError::QueryFailed)?;
    }
    Ok(inserted)
}

fn to_stored(rows: Vec<RateDB>) -> Result<Vec<StoredRate>> {
    rows.into_iter()
        .map(|row| StoredRate::try_from(row).map_err(Into::into))
        .collect()
}

// =============================================================================
// RateStore Implementation
// =============================================================================

#[async_trait]
impl RateStore for RateRepository {
    // =========================================================================
    // Mutations
    // =========================================================================

    async fn upsert_batch(&self, quotes: &[InstrumentQuote]) -> Result<UpsertSummary> {
        if quotes.is_empty() {
            return Ok(UpsertSummary::default());
        }

        let db_rows: Vec<RateDB> = quotes.iter().map(RateDB::from).collect();

        let summary = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UpsertSummary> {
                let mut summary = UpsertSummary::default();
                let mut absent = Vec::new();

                for row in db_rows {
                    let changed = diesel::update(
                        rates_dsl::currency_rates
                            .filter(rates_dsl::code.eq(&row.code))
                            .filter(rates_dsl::effective_date.eq(&row.effective_date)),
                    )
                    .set((rates_dsl::bid.eq(row.bid), rates_dsl::ask.eq(row.ask)))
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;

                    if changed == 0 {
                        absent.push(row);
                    } else {
                        summary.updated += changed;
                    }
                }

                summary.inserted = insert_rows(conn, &absent)?;
                Ok(summary)
            })
            .await?;

        info!(
            "Upserted {} rate(s): {} inserted, {} updated",
            summary.total(),
            summary.inserted,
            summary.updated
        );
        Ok(summary)
    }

    async fn insert_batch(&self, quotes: &[InstrumentQuote]) -> Result<usize> {
        if quotes.is_empty() {
            return Ok(0);
        }

        let db_rows: Vec<RateDB> = quotes.iter().map(RateDB::from).collect();

        let inserted = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                insert_rows(conn, &db_rows)
            })
            .await?;

        info!("Inserted {} rate(s)", inserted);
        Ok(inserted)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    fn get_rate(&self, code: &str, date: NaiveDate) -> Result<Option<StoredRate>> {
        let mut conn = get_connection(&self.pool)?;

        let row = rates_dsl::currency_rates
            .find((code.to_string(), date.format(DATE_FORMAT).to_string()))
            .select(RateDB::as_select())
            .first::<RateDB>(&mut conn)
            .optional()
            .into_core()?;

        row.map(|r| StoredRate::try_from(r).map_err(Into::into))
            .transpose()
    }

    fn get_rates_in_range(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StoredRate>> {
        let mut conn = get_connection(&self.pool)?;

        let start_str = start.format(DATE_FORMAT).to_string();
        let end_str = end.format(DATE_FORMAT).to_string();

        let rows = rates_dsl::currency_rates
            .filter(rates_dsl::code.eq(code))
            .filter(rates_dsl::effective_date.ge(&start_str))
            .filter(rates_dsl::effective_date.le(&end_str))
            .order(rates_dsl::effective_date.asc())
            .select(RateDB::as_select())
            .load::<RateDB>(&mut conn)
            .into_core()?;

        debug!(
            "Loaded {} rate(s) for {} between {} and {}",
            rows.len(),
            code,
            start_str,
            end_str
        );
        to_stored(rows)
    }
}
