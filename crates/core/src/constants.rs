/// Date format used on the wire and in the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default SQLite file, in the working directory where earlier tooling kept it.
pub const DEFAULT_DB_PATH: &str = "currency_rates.db";
