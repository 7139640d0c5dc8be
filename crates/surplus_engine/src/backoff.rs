use std::time::Duration;

use crate::SourceError;

/// Delay before retrying after a failed cycle: grows linearly with the
/// failure streak up to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub max: Duration,
    /// Minimum wait after the marketplace rate-limited us.
    pub rate_limit_floor: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(5),
            max: Duration::from_secs(60),
            rate_limit_floor: Duration::from_secs(30),
        }
    }
}

impl BackoffPolicy {
    pub fn flat(delay: Duration) -> Self {
        Self {
            base: delay,
            max: delay,
            rate_limit_floor: delay,
        }
    }

    pub fn delay(&self, consecutive_failures: u32, error: &SourceError) -> Duration {
        let streak = consecutive_failures.max(1);
        let delay = self.base.saturating_mul(streak).min(self.max);
        match error {
            SourceError::RateLimited { retry_after } => {
                let floor = retry_after.unwrap_or(self.rate_limit_floor);
                let cap = self.max.max(self.rate_limit_floor);
                delay.max(floor.min(cap))
            }
            _ => delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_linearly_then_caps() {
        let policy = BackoffPolicy::default();
        let err = SourceError::Timeout;
        assert_eq!(policy.delay(1, &err), Duration::from_secs(5));
        assert_eq!(policy.delay(3, &err), Duration::from_secs(15));
        assert_eq!(policy.delay(50, &err), Duration::from_secs(60));
        assert_eq!(policy.delay(u32::MAX, &err), Duration::from_secs(60));
    }

    #[test]
    fn zero_failures_is_treated_as_one() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay(0, &SourceError::Timeout), Duration::from_secs(5));
    }

    #[test]
    fn rate_limit_waits_at_least_the_floor_or_retry_after() {
        let policy = BackoffPolicy::default();
        let limited = SourceError::RateLimited { retry_after: None };
        assert_eq!(policy.delay(1, &limited), Duration::from_secs(30));

        let limited = SourceError::RateLimited {
            retry_after: Some(Duration::from_secs(45)),
        };
        assert_eq!(policy.delay(1, &limited), Duration::from_secs(45));

        let limited = SourceError::RateLimited {
            retry_after: Some(Duration::from_secs(3600)),
        };
        assert_eq!(policy.delay(1, &limited), Duration::from_secs(60));
    }

    #[test]
    fn flat_policy_ignores_streak() {
        let policy = BackoffPolicy::flat(Duration::from_secs(2));
        assert_eq!(policy.delay(9, &SourceError::Network("x".into())), Duration::from_secs(2));
    }
}
