use std::time::Duration;

/// Default number of attempts per request, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default backoff unit; the wait after failed attempt `k` is `2^k` units.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Bounded retry with exponential backoff and no jitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts,
            backoff_unit,
        }
    }

    /// Attempts actually made; a policy always allows at least one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait before the next attempt once attempt `attempt_index` (0-indexed) failed.
    pub fn delay_after(&self, attempt_index: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt_index).unwrap_or(u32::MAX);
        self.backoff_unit.saturating_mul(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.delay_after(0), Duration::from_secs(1));
        assert_eq!(policy.delay_after(1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(2), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let policy = RetryPolicy::new(0, Duration::from_millis(5));
        assert_eq!(policy.attempts(), 1);
    }

    #[test]
    fn test_delay_saturates() {
        let policy = RetryPolicy::new(100, Duration::from_millis(10));
        assert_eq!(
            policy.delay_after(64),
            Duration::from_millis(10).saturating_mul(u32::MAX)
        );
    }
}
