use std::fmt;

use serde::Serialize;

/// Stages of one pipeline within an ingestion run, in order.
///
/// No stage is re-entered within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStage {
    Partitioning,
    Fetching,
    Normalizing,
    Upserting,
    Done,
}

impl IngestStage {
    pub fn next(self) -> Option<IngestStage> {
        match self {
            Self::Partitioning => Some(Self::Fetching),
            Self::Fetching => Some(Self::Normalizing),
            Self::Normalizing => Some(Self::Upserting),
            Self::Upserting => Some(Self::Done),
            Self::Done => None,
        }
    }
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Partitioning => "partitioning",
            Self::Fetching => "fetching",
            Self::Normalizing => "normalizing",
            Self::Upserting => "upserting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}
