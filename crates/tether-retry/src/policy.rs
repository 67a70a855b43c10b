//! Attempt budget and backoff configuration.

use crate::budget::AttemptBudget;
use std::num::NonZeroU32;
use std::time::Duration;
use tether_core::{ConfigError, ConfigResult, RetryConfig};

/// Default number of attempts per logical call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// How many times a call may fail transiently and how long to wait between
/// attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: NonZeroU32,
    delay: Duration,
}

impl RetryPolicy {
    /// A policy with `max_attempts` attempts and no delay.
    #[must_use]
    pub fn new(max_attempts: NonZeroU32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    /// Build from configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if `max_attempts` is zero.
    pub fn from_config(config: &RetryConfig) -> ConfigResult<Self> {
        let max_attempts = NonZeroU32::new(config.max_attempts)
            .ok_or_else(|| ConfigError::invalid("retry.max_attempts", "must be at least 1"))?;
        Ok(Self::new(max_attempts).with_delay(Duration::from_millis(config.delay_ms)))
    }

    /// Set the base delay. The wait after the k-th failure is `delay * k`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Attempts per logical call.
    #[must_use]
    pub fn max_attempts(&self) -> NonZeroU32 {
        self.max_attempts
    }

    /// Wait applied after the `failure`-th transient failure (1-based).
    #[must_use]
    pub fn delay_for(&self, failure: u32) -> Duration {
        self.delay.saturating_mul(failure)
    }

    /// A fresh budget for one call.
    pub(crate) fn budget(&self) -> AttemptBudget {
        AttemptBudget::new(self.max_attempts)
    }

    /// Sleep for the backoff that follows the `failure`-th transient failure.
    pub(crate) async fn pause(&self, failure: u32) {
        let delay = self.delay_for(failure);
        if !delay.is_zero() {
            tracing::debug!("Waiting {:?} before next attempt", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU32::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts().get(), 4);
        assert_eq!(policy.delay_for(3), Duration::ZERO);
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::default().with_delay(Duration::from_millis(200));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(600));
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig {
            max_attempts: 2,
            delay_ms: 50,
        };
        let policy = RetryPolicy::from_config(&config).expect("valid config");
        assert_eq!(policy.max_attempts().get(), 2);
        assert_eq!(policy.delay_for(2), Duration::from_millis(100));

        let config = RetryConfig {
            max_attempts: 0,
            delay_ms: 0,
        };
        assert!(RetryPolicy::from_config(&config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_sleeps_for_backoff() {
        let policy = RetryPolicy::default().with_delay(Duration::from_secs(2));
        let start = tokio::time::Instant::now();
        policy.pause(2).await;
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
