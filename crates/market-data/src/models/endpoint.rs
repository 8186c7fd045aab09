use serde::{Deserialize, Serialize};

use super::{DateRange, InstrumentKind};

/// A remote collection addressed as `{base_url}/{start}/{end}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub kind: InstrumentKind,
    pub base_url: String,
}

impl Endpoint {
    pub fn new(kind: InstrumentKind, base_url: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
        }
    }

    /// Endpoint at the public NBP address for `kind`.
    pub fn nbp(kind: InstrumentKind) -> Self {
        Self::new(kind, kind.default_base_url())
    }

    pub fn url_for(&self, range: &DateRange) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            range.start().format("%Y-%m-%d"),
            range.end().format("%Y-%m-%d")
        )
    }
}
