//! Reconnection backoff policy

use std::time::Duration;

/// Linear backoff with a ceiling and a bounded number of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Delay added per attempt
    pub step: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Attempts before giving up
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            step: Duration::from_millis(100),
            max_delay: Duration::from_millis(3000),
            max_attempts: 10,
        }
    }
}

impl ReconnectPolicy {
    /// Policy with the default timings and a custom attempt cap
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Delay before the given 1-based attempt: `min(attempt * step, max_delay)`
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt).min(self.max_delay)
    }

    /// Whether the given 1-based attempt is still allowed
    #[must_use]
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_attempts
    }
}
