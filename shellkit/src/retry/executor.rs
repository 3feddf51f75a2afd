//! Synchronous retry executor.

use super::clock::{Clock, Sleeper, SystemClock, ThreadSleeper};
use super::outcome::{IntoAttempt, RetryOutcome};
use super::policy::{RetryPolicy, Schedule};
use crate::cancellation::CancellationToken;
use crate::errors::RetryError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Result type returned by every retry entry point.
pub type RetryResult<R> =
    Result<RetryOutcome<<R as IntoAttempt>::Success, <R as IntoAttempt>::Failure>, RetryError>;

/// Runs operations under a [`RetryPolicy`].
///
/// The executor holds only its collaborators, so one instance can serve
/// any number of independent runs, including concurrent ones when the
/// clock and sleeper are `Sync`.
///
/// # Examples
///
/// ```
/// use shellkit::retry::RetryExecutor;
///
/// let mut calls = 0;
/// let outcome = RetryExecutor::new()
///     .retry_fixed(3, 0.0, || {
///         calls += 1;
///         calls == 2
///     })
///     .unwrap();
///
/// assert!(outcome.is_success());
/// assert_eq!(outcome.attempts(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor<C = SystemClock, S = ThreadSleeper> {
    clock: C,
    sleeper: S,
    cancellation: Option<Arc<CancellationToken>>,
}

impl RetryExecutor<SystemClock, ThreadSleeper> {
    /// Creates an executor using the system clock and thread sleeps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_collaborators(SystemClock, ThreadSleeper)
    }
}

impl<C: Clock, S: Sleeper> RetryExecutor<C, S> {
    /// Creates an executor with custom time collaborators.
    #[must_use]
    pub fn with_collaborators(clock: C, sleeper: S) -> Self {
        Self {
            clock,
            sleeper,
            cancellation: None,
        }
    }

    /// Stops runs between attempts once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Retries with a constant pause between attempts.
    pub fn retry_fixed<F, R>(
        &self,
        max_attempts: u32,
        delay_secs: f64,
        operation: F,
    ) -> RetryResult<R>
    where
        F: FnMut() -> R,
        R: IntoAttempt,
    {
        let policy = RetryPolicy::fixed(max_attempts, delay_secs)?;
        self.run(&policy, operation)
    }

    /// Retries with a pause that doubles after each failure, capped at
    /// `max_delay_secs`.
    pub fn retry_with_backoff<F, R>(
        &self,
        max_attempts: u32,
        initial_delay_secs: f64,
        max_delay_secs: f64,
        operation: F,
    ) -> RetryResult<R>
    where
        F: FnMut() -> R,
        R: IntoAttempt,
    {
        let policy = RetryPolicy::backoff(max_attempts, initial_delay_secs, max_delay_secs)?;
        self.run(&policy, operation)
    }

    /// Retries once per second until `timeout_secs` have elapsed.
    pub fn retry_until_deadline<F, R>(&self, timeout_secs: f64, operation: F) -> RetryResult<R>
    where
        F: FnMut() -> R,
        R: IntoAttempt,
    {
        let policy = RetryPolicy::deadline(timeout_secs)?;
        self.run(&policy, operation)
    }

    /// Runs `operation` under `policy`.
    ///
    /// The policy is validated before the first attempt. The only error is
    /// [`RetryError::InvalidPolicy`]; exhaustion and cancellation are
    /// reported as outcomes.
    pub fn run<F, R>(&self, policy: &RetryPolicy, mut operation: F) -> RetryResult<R>
    where
        F: FnMut() -> R,
        R: IntoAttempt,
    {
        policy.validate()?;

        let mut schedule = Schedule::new(*policy);
        let start = self.clock.now();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            let last_failure = match operation().into_attempt() {
                Ok(value) => {
                    if attempts > 1 {
                        debug!(attempts, "Operation succeeded after retrying");
                    }
                    return Ok(RetryOutcome::Success { value, attempts });
                }
                Err(failure) => failure,
            };

            let elapsed = self.clock.now().saturating_duration_since(start);
            log_failure(policy, attempts, elapsed);

            let Some(delay) = schedule.after_failure(attempts, elapsed) else {
                log_exhausted(policy, attempts, elapsed);
                return Ok(RetryOutcome::Exhausted {
                    last_failure,
                    attempts,
                });
            };

            if self.cancelled(attempts) {
                return Ok(RetryOutcome::Cancelled {
                    last_failure,
                    attempts,
                });
            }

            self.sleeper.sleep(delay);

            if self.cancelled(attempts) {
                return Ok(RetryOutcome::Cancelled {
                    last_failure,
                    attempts,
                });
            }
        }
    }

    fn cancelled(&self, attempts: u32) -> bool {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => {
                info!(
                    attempts,
                    reason = %token.reason().unwrap_or_default(),
                    "Retry cancelled"
                );
                true
            }
            _ => false,
        }
    }
}

pub(crate) fn log_failure(policy: &RetryPolicy, attempt: u32, elapsed: Duration) {
    match policy {
        RetryPolicy::Deadline { timeout, .. } => warn!(
            attempt,
            elapsed_ms = millis(elapsed),
            timeout_ms = millis(*timeout),
            "Attempt {} failed",
            attempt
        ),
        RetryPolicy::Fixed { max_attempts, .. } | RetryPolicy::Backoff { max_attempts, .. } => {
            warn!(
                attempt,
                max_attempts,
                "Attempt {}/{} failed",
                attempt,
                max_attempts
            );
        }
    }
}

pub(crate) fn log_exhausted(policy: &RetryPolicy, attempts: u32, elapsed: Duration) {
    match policy {
        RetryPolicy::Deadline { timeout, .. } => error!(
            attempts,
            elapsed_ms = millis(elapsed),
            "Operation did not succeed within {:?}",
            timeout
        ),
        _ => error!(attempts, "Operation failed after {} attempts", attempts),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Retries with a constant pause, using the system clock.
pub fn retry_fixed<F, R>(max_attempts: u32, delay_secs: f64, operation: F) -> RetryResult<R>
where
    F: FnMut() -> R,
    R: IntoAttempt,
{
    RetryExecutor::new().retry_fixed(max_attempts, delay_secs, operation)
}

/// Retries with doubling pauses, using the system clock.
pub fn retry_with_backoff<F, R>(
    max_attempts: u32,
    initial_delay_secs: f64,
    max_delay_secs: f64,
    operation: F,
) -> RetryResult<R>
where
    F: FnMut() -> R,
    R: IntoAttempt,
{
    RetryExecutor::new().retry_with_backoff(
        max_attempts,
        initial_delay_secs,
        max_delay_secs,
        operation,
    )
}

/// Retries until a wall-clock budget is spent, using the system clock.
pub fn retry_until_deadline<F, R>(timeout_secs: f64, operation: F) -> RetryResult<R>
where
    F: FnMut() -> R,
    R: IntoAttempt,
{
    RetryExecutor::new().retry_until_deadline(timeout_secs, operation)
}
