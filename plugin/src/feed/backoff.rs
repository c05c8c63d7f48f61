//! Exponential backoff between reconnect attempts.

use std::time::Duration;

/// Reconnect policy for a feed connection.
///
/// Retries with exponentially increasing delays, capped at `max_delay`.
/// `max_attempts` of `None` retries forever.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether retry number `attempt` may still be made.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_delay() {
        let policy = ReconnectPolicy::default().with_base_delay(Duration::from_secs(1));

        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(0), policy.delay_for(1));
    }

    #[test]
    fn test_max_delay_cap() {
        let policy = ReconnectPolicy::default();

        assert_eq!(policy.delay_for(10), Duration::from_secs(30));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn test_uncapped_delay_saturates() {
        let policy = ReconnectPolicy::default()
            .with_base_delay(Duration::from_secs(10))
            .with_max_delay(Duration::MAX);

        assert_eq!(policy.delay_for(3), Duration::from_secs(40));
        assert!(policy.delay_for(62) >= policy.delay_for(32));

        let huge = policy.with_base_delay(Duration::from_secs(u64::MAX / 2));
        assert_eq!(huge.delay_for(3), Duration::MAX);
    }

    #[test]
    fn test_attempt_limit() {
        let unlimited = ReconnectPolicy::default();
        assert!(unlimited.allows(1_000_000));

        let limited = ReconnectPolicy::default().with_max_attempts(Some(2));
        assert!(limited.allows(1));
        assert!(limited.allows(2));
        assert!(!limited.allows(3));
    }
}
