/// Classification for retry policy.
///
/// Used by the fetcher to decide whether a failed attempt is worth repeating.
///
/// | Class | Retry same request? |
/// |-------|---------------------|
/// | `Never` | No |
/// | `WithBackoff` | Yes, after the policy's backoff delay |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request itself is invalid.
    Never,

    /// Retry after an exponential backoff delay.
    ///
    /// Used for non-2xx responses, transport failures and unreadable bodies.
    WithBackoff,
}
