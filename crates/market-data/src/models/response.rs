use serde_json::Value;

use super::DateRange;

/// JSON body fetched for one sub-range, still unparsed.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub range: DateRange,
    pub url: String,
    pub body: Value,
}
