use std::time::Duration;

/// Default attempt cap for generation calls.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Backoff policy for the generation endpoint: a fixed doubling schedule
/// (1s, 2s, 4s, ...) that a server-provided `Retry-After` overrides.
///
/// The schedule carries no jitter; the exact delays are part of the
/// observable contract and the tests assert them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after a failed `attempt` (1-based) before the next one.
    /// `retry_after` wins when the server sent one.
    pub fn delay_after(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(wait) = retry_after {
            return wait;
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Whether another attempt may follow `attempt` (1-based).
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
