//! Utility functions for SQLite storage operations.

/// Maximum number of rows per multi-row statement.
///
/// SQLite caps the number of bound parameters per statement, so batch
/// inserts are split into chunks of this many rows.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into pieces of at most [`SQLITE_MAX_PARAMS_CHUNK`] items.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
