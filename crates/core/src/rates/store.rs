//! Rate storage traits.
//!
//! This module defines the storage interface for normalized rates. The trait
//! abstracts the persistence layer so the ingestion driver can be tested
//! against an in-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{InstrumentQuote, StoredRate, UpsertSummary};
use crate::errors::Result;

/// Storage interface for rate history.
///
/// Rows are keyed by `(code, effective_date)`. The ingestion pipeline never
/// deletes rows.
///
/// # Design Notes
///
/// - Async methods are used for mutations, which go through the single writer
/// - Sync methods are used for reads
/// - Every batch commits or rolls back as a whole
#[async_trait]
pub trait RateStore: Send + Sync {
    // =========================================================================
    // Mutations
    // =========================================================================

    /// Upserts a batch of quotes in one transaction.
    ///
    /// Each quote is looked up by its composite key: existing rows get `bid`
    /// and `ask` overwritten, missing rows are bulk inserted.
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateKey` if the bulk insert hits a uniqueness
    /// violation (for example the same new key twice in `quotes`). Nothing
    /// from the batch is kept in that case.
    async fn upsert_batch(&self, quotes: &[InstrumentQuote]) -> Result<UpsertSummary>;

    /// Upserts a single quote.
    async fn upsert_rate(&self, quote: &InstrumentQuote) -> Result<UpsertSummary> {
        self.upsert_batch(std::slice::from_ref(quote)).await
    }

    /// Inserts a batch of new quotes without looking them up first.
    ///
    /// # Returns
    ///
    /// The number of rows inserted. Any key conflict rolls back the batch
    /// and surfaces as `DatabaseError::DuplicateKey`.
    async fn insert_batch(&self, quotes: &[InstrumentQuote]) -> Result<usize>;

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gets the stored rate for one code and date.
    fn get_rate(&self, code: &str, date: NaiveDate) -> Result<Option<StoredRate>>;

    /// Gets rates for one code between `start` and `end` (inclusive),
    /// ordered by date ascending.
    fn get_rates_in_range(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StoredRate>>;
}
