//! Retry policies and the per-run delay schedule.

use crate::errors::RetryError;
use std::time::Duration;

/// Pause between attempts of a deadline-bounded run unless overridden.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How many attempts to make and how long to wait between them.
///
/// Constructors take seconds as `f64` and reject negative or non-finite
/// values, so the same checks apply to values read from configuration or
/// the command line. Values too large for a [`Duration`] saturate at
/// [`Duration::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Up to `max_attempts` attempts, `delay` apart.
    Fixed {
        /// Attempt budget (>= 1).
        max_attempts: u32,
        /// Pause after each failed attempt except the last.
        delay: Duration,
    },
    /// Up to `max_attempts` attempts with doubling delays capped at `max_delay`.
    Backoff {
        /// Attempt budget (>= 1).
        max_attempts: u32,
        /// Pause after the first failure.
        initial_delay: Duration,
        /// Upper bound for any pause.
        max_delay: Duration,
    },
    /// Attempts until `timeout` has elapsed, `poll_interval` apart.
    ///
    /// The deadline is only checked between attempts.
    Deadline {
        /// Wall-clock budget.
        timeout: Duration,
        /// Pause after each failed attempt.
        poll_interval: Duration,
    },
}

impl RetryPolicy {
    /// Creates a fixed-delay policy.
    pub fn fixed(max_attempts: u32, delay_secs: f64) -> Result<Self, RetryError> {
        let policy = Self::Fixed {
            max_attempts,
            delay: seconds("delay", delay_secs)?,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Creates an exponential backoff policy.
    pub fn backoff(
        max_attempts: u32,
        initial_delay_secs: f64,
        max_delay_secs: f64,
    ) -> Result<Self, RetryError> {
        let policy = Self::Backoff {
            max_attempts,
            initial_delay: seconds("initial_delay", initial_delay_secs)?,
            max_delay: seconds("max_delay", max_delay_secs)?,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Creates a deadline policy polling once per second.
    pub fn deadline(timeout_secs: f64) -> Result<Self, RetryError> {
        Ok(Self::Deadline {
            timeout: seconds("timeout", timeout_secs)?,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Overrides the poll interval of a deadline policy.
    ///
    /// Other policies are returned unchanged.
    pub fn with_poll_interval(self, interval_secs: f64) -> Result<Self, RetryError> {
        match self {
            Self::Deadline { timeout, .. } => Ok(Self::Deadline {
                timeout,
                poll_interval: seconds("poll_interval", interval_secs)?,
            }),
            other => Ok(other),
        }
    }

    /// Checks invariants that the type system cannot express.
    pub fn validate(&self) -> Result<(), RetryError> {
        match self {
            Self::Fixed { max_attempts, .. } | Self::Backoff { max_attempts, .. }
                if *max_attempts < 1 =>
            {
                Err(RetryError::invalid_policy("max_attempts must be >= 1"))
            }
            _ => Ok(()),
        }
    }

    /// Returns the attempt budget, or `None` for deadline policies.
    #[must_use]
    pub fn max_attempts(&self) -> Option<u32> {
        match self {
            Self::Fixed { max_attempts, .. } | Self::Backoff { max_attempts, .. } => {
                Some(*max_attempts)
            }
            Self::Deadline { .. } => None,
        }
    }

    /// Returns the pauses an always-failing run would take.
    ///
    /// `None` for deadline policies, whose pause count depends on time.
    #[must_use]
    pub fn planned_delays(&self) -> Option<Vec<Duration>> {
        let max_attempts = self.max_attempts()?;
        let mut schedule = Schedule::new(*self);
        Some(
            (1..=max_attempts)
                .map_while(|attempt| schedule.after_failure(attempt, Duration::ZERO))
                .collect(),
        )
    }
}

fn seconds(field: &str, value: f64) -> Result<Duration, RetryError> {
    if !value.is_finite() || value < 0.0 {
        return Err(RetryError::invalid_policy(format!(
            "{field} must be a non-negative number of seconds, got {value}"
        )));
    }
    Ok(Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX))
}

/// Per-run state deciding whether and how long to wait after a failure.
#[derive(Debug, Clone)]
pub struct Schedule {
    policy: RetryPolicy,
    next_backoff: Duration,
}

impl Schedule {
    /// Starts a schedule for one run.
    #[must_use]
    pub fn new(policy: RetryPolicy) -> Self {
        let next_backoff = match policy {
            RetryPolicy::Backoff { initial_delay, .. } => initial_delay,
            _ => Duration::ZERO,
        };
        Self {
            policy,
            next_backoff,
        }
    }

    /// Called after failed attempt number `attempt` (1-based).
    ///
    /// Returns the pause before the next attempt, or `None` when the budget
    /// is spent.
    pub fn after_failure(&mut self, attempt: u32, elapsed: Duration) -> Option<Duration> {
        match self.policy {
            RetryPolicy::Fixed {
                max_attempts,
                delay,
            } => (attempt < max_attempts).then_some(delay),
            RetryPolicy::Backoff {
                max_attempts,
                max_delay,
                ..
            } => {
                if attempt >= max_attempts {
                    return None;
                }
                let delay = self.next_backoff.min(max_delay);
                self.next_backoff = delay.saturating_mul(2).min(max_delay);
                Some(delay)
            }
            RetryPolicy::Deadline {
                timeout,
                poll_interval,
            } => (elapsed < timeout).then_some(poll_interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|s| Duration::from_secs(*s)).collect()
    }

    #[test]
    fn test_fixed_rejects_zero_attempts() {
        assert!(matches!(
            RetryPolicy::fixed(0, 1.0),
            Err(RetryError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn test_negative_and_non_finite_delays_rejected() {
        assert!(RetryPolicy::backoff(3, -1.0, 10.0).is_err());
        assert!(RetryPolicy::backoff(3, 1.0, f64::NAN).is_err());
        assert!(RetryPolicy::fixed(3, f64::INFINITY).is_err());
        assert!(RetryPolicy::deadline(-0.5).is_err());
    }

    #[test]
    fn test_huge_delays_saturate() {
        let policy = RetryPolicy::backoff(3, 1.0, 1e20).unwrap();
        assert_eq!(policy.planned_delays().unwrap(), secs(&[1, 2]));

        assert_eq!(
            RetryPolicy::deadline(1e20).unwrap(),
            RetryPolicy::Deadline {
                timeout: Duration::MAX,
                poll_interval: DEFAULT_POLL_INTERVAL,
            }
        );
    }

    #[test]
    fn test_validate_catches_hand_built_policy() {
        let policy = RetryPolicy::Backoff {
            max_attempts: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::backoff(4, 2.0, 100.0).unwrap();
        assert_eq!(policy.planned_delays().unwrap(), secs(&[2, 4, 8]));
    }

    #[test]
    fn test_backoff_clamps_at_max_delay() {
        let policy = RetryPolicy::backoff(5, 50.0, 60.0).unwrap();
        assert_eq!(policy.planned_delays().unwrap(), secs(&[50, 60, 60, 60]));
    }

    #[test]
    fn test_backoff_initial_above_max_is_clamped() {
        let policy = RetryPolicy::backoff(3, 10.0, 4.0).unwrap();
        assert_eq!(policy.planned_delays().unwrap(), secs(&[4, 4]));
    }

    #[test]
    fn test_backoff_saturates_instead_of_overflowing() {
        let policy = RetryPolicy::Backoff {
            max_attempts: 200,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::MAX,
        };
        let delays = policy.planned_delays().unwrap();
        assert_eq!(delays.len(), 199);
        assert_eq!(*delays.last().unwrap(), Duration::MAX);
    }

    #[test]
    fn test_fixed_delays() {
        let policy = RetryPolicy::fixed(3, 1.0).unwrap();
        assert_eq!(policy.planned_delays().unwrap(), secs(&[1, 1]));
    }

    #[test]
    fn test_single_attempt_has_no_delays() {
        let policy = RetryPolicy::fixed(1, 5.0).unwrap();
        assert!(policy.planned_delays().unwrap().is_empty());
    }

    #[test]
    fn test_deadline_schedule() {
        let policy = RetryPolicy::deadline(3.0).unwrap();
        let mut schedule = Schedule::new(policy);

        assert_eq!(
            schedule.after_failure(1, Duration::from_secs(2)),
            Some(DEFAULT_POLL_INTERVAL)
        );
        assert_eq!(schedule.after_failure(2, Duration::from_secs(3)), None);
        assert!(policy.planned_delays().is_none());
    }

    #[test]
    fn test_zero_deadline_exhausts_immediately() {
        let mut schedule = Schedule::new(RetryPolicy::deadline(0.0).unwrap());
        assert_eq!(schedule.after_failure(1, Duration::ZERO), None);
    }

    #[test]
    fn test_poll_interval_override() {
        let policy = RetryPolicy::deadline(10.0)
            .unwrap()
            .with_poll_interval(0.25)
            .unwrap();
        assert_eq!(
            policy,
            RetryPolicy::Deadline {
                timeout: Duration::from_secs(10),
                poll_interval: Duration::from_millis(250),
            }
        );

        let fixed = RetryPolicy::fixed(2, 1.0).unwrap();
        assert_eq!(fixed.with_poll_interval(0.25).unwrap(), fixed);
    }
}
