//! Simple exponential backoff retry policy for deferred jobs.

use std::time::Duration;

/// Exponential backoff retry policy.
///
/// Re-runs failed jobs with exponentially increasing delays, capped at a
/// maximum. Applies only to handler outcome failures; the worker never
/// retries jobs it could not resolve in the first place.
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Create a new retry policy with default delays (1s base, 60s cap).
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Maximum number of retry attempts after the first run
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }

    /// Create a retry policy with explicit delay bounds.
    pub fn with_delays(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// Whether another attempt is allowed after `n_past_retries` retries.
    pub fn should_retry(&self, n_past_retries: u32) -> bool {
        n_past_retries < self.max_retries
    }

    /// Calculate exponential backoff delay for the next attempt.
    pub fn delay(&self, n_past_retries: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * 2_f64.powi(n_past_retries as i32);
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }
}
