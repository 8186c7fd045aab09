use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Synthetic instrument code under which gold prices are stored.
pub const GOLD_CODE: &str = "GOLD_gold";

/// Default NBP table C endpoint (bid/ask currency rates).
pub const DEFAULT_RATES_URL: &str = "https://api.nbp.pl/api/exchangerates/tables/c";

/// Default NBP gold price endpoint.
pub const DEFAULT_GOLD_URL: &str = "https://api.nbp.pl/api/cenyzlota";

/// Instrument families ingested from NBP.
///
/// The kind selects the endpoint, the first date with published history and
/// the payload mapping applied during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentKind {
    CurrencyRates,
    Gold,
}

impl InstrumentKind {
    pub const ALL: [InstrumentKind; 2] = [InstrumentKind::CurrencyRates, InstrumentKind::Gold];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrencyRates => "currency_rates",
            Self::Gold => "gold",
        }
    }

    /// First day the source publishes data for this kind.
    pub fn history_start(&self) -> NaiveDate {
        let (y, m, d) = match self {
            Self::CurrencyRates => (2002, 1, 2),
            Self::Gold => (2013, 1, 2),
        };
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::CurrencyRates => DEFAULT_RATES_URL,
            Self::Gold => DEFAULT_GOLD_URL,
        }
    }
}

impl std::fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
