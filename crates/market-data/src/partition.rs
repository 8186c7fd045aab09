//! Splitting of long date intervals into source-sized request windows.

use chrono::{Days, NaiveDate};
use log::debug;

use crate::errors::MarketDataError;
use crate::models::DateRange;

/// Widest window, in days, the NBP API serves in a single request.
pub const MAX_CHUNK_DAYS: u32 = 93;

/// Window used when nothing else is configured.
pub const DEFAULT_CHUNK_DAYS: u32 = 90;

/// Splits `[start, end]` into consecutive ranges at most `chunk_size_days` wide.
///
/// The ranges are ordered, contiguous and non-overlapping, and together cover
/// exactly `[start, end]`. Each range is `[s, min(s + chunk_size_days - 1, end)]`
/// and the next one starts the day after.
///
/// # Errors
///
/// - [`MarketDataError::InvalidRange`] if `start > end`
/// - [`MarketDataError::InvalidChunkSize`] if `chunk_size_days` is zero
pub fn partition(
    start: NaiveDate,
    end: NaiveDate,
    chunk_size_days: u32,
) -> Result<Vec<DateRange>, MarketDataError> {
    if start > end {
        return Err(MarketDataError::InvalidRange { start, end });
    }
    if chunk_size_days == 0 {
        return Err(MarketDataError::InvalidChunkSize(chunk_size_days));
    }

    let step = Days::new(u64::from(chunk_size_days - 1));
    let mut ranges = Vec::new();
    let mut cursor = start;

    loop {
        let chunk_end = cursor
            .checked_add_days(step)
            .map_or(end, |candidate| candidate.min(end));
        ranges.push(DateRange::new(cursor, chunk_end)?);

        match chunk_end.succ_opt() {
            Some(next) if chunk_end < end => cursor = next,
            _ => break,
        }
    }

    debug!(
        "Partitioned {}..{} into {} range(s) of at most {} day(s)",
        start,
        end,
        ranges.len(),
        chunk_size_days
    );

    Ok(ranges)
}
