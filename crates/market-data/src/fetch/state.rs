use serde_json::Value;

/// Progress of one range fetch.
///
/// `Pending -> Retrying(n) -> Fetched | GivenUp`. The terminal states are never
/// left; a new fetch starts over from `Pending`.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState {
    Pending,
    Retrying {
        failed_attempts: u32,
        last_error: String,
    },
    Fetched {
        attempts: u32,
        body: Value,
    },
    GivenUp {
        attempts: u32,
        last_error: String,
    },
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fetched { .. } | Self::GivenUp { .. })
    }

    /// Failed attempts recorded so far.
    pub fn failed_attempts(&self) -> u32 {
        match self {
            Self::Pending => 0,
            Self::Retrying {
                failed_attempts, ..
            } => *failed_attempts,
            Self::Fetched { attempts, .. } => attempts.saturating_sub(1),
            Self::GivenUp { attempts, .. } => *attempts,
        }
    }

    /// The outcome of a terminal state; an in-flight state is handed back.
    pub fn into_outcome(self) -> Result<FetchOutcome, FetchState> {
        match self {
            Self::Fetched { body, .. } => Ok(FetchOutcome::Fetched(body)),
            Self::GivenUp {
                attempts,
                last_error,
            } => Ok(FetchOutcome::GivenUp {
                attempts,
                last_error,
            }),
            in_flight @ (Self::Pending | Self::Retrying { .. }) => Err(in_flight),
        }
    }
}

/// Final result of a range fetch. Exhaustion is a value, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    Fetched(Value),
    GivenUp { attempts: u32, last_error: String },
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Self::Fetched(body) => Some(body),
            Self::GivenUp { .. } => None,
        }
    }
}
