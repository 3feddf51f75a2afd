//! Async retry executor for operations returning futures.
//!
//! Mirrors [`RetryExecutor`](super::RetryExecutor): same policies, same
//! schedule, same outcomes. Pauses go through an [`AsyncSleeper`] so the
//! runtime thread is not blocked.

use super::clock::{Clock, SystemClock};
use super::executor::{log_exhausted, log_failure, RetryResult};
use super::guard::{panic_message, AttemptFault};
use super::outcome::{IntoAttempt, RetryOutcome};
use super::policy::{RetryPolicy, Schedule};
use crate::cancellation::CancellationToken;
use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Pauses a task between attempts.
#[async_trait]
pub trait AsyncSleeper: Send + Sync {
    /// Pauses for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps with [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl AsyncSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<T: AsyncSleeper + ?Sized> AsyncSleeper for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Runs async operations under a [`RetryPolicy`].
#[derive(Debug, Clone, Default)]
pub struct AsyncRetryExecutor<C = SystemClock, S = TokioSleeper> {
    clock: C,
    sleeper: S,
    cancellation: Option<Arc<CancellationToken>>,
}

impl AsyncRetryExecutor<SystemClock, TokioSleeper> {
    /// Creates an executor using the system clock and tokio sleeps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_collaborators(SystemClock, TokioSleeper)
    }
}

impl<C: Clock, S: AsyncSleeper> AsyncRetryExecutor<C, S> {
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
    pub async fn retry_fixed<F, Fut>(
        &self,
        max_attempts: u32,
        delay_secs: f64,
        operation: F,
    ) -> RetryResult<Fut::Output>
    where
        F: FnMut() -> Fut,
        Fut: Future,
        Fut::Output: IntoAttempt,
    {
        let policy = RetryPolicy::fixed(max_attempts, delay_secs)?;
        self.run(&policy, operation).await
    }

    /// Retries with doubling pauses capped at `max_delay_secs`.
    pub async fn retry_with_backoff<F, Fut>(
        &self,
        max_attempts: u32,
        initial_delay_secs: f64,
        max_delay_secs: f64,
        operation: F,
    ) -> RetryResult<Fut::Output>
    where
        F: FnMut() -> Fut,
        Fut: Future,
        Fut::Output: IntoAttempt,
    {
        let policy = RetryPolicy::backoff(max_attempts, initial_delay_secs, max_delay_secs)?;
        self.run(&policy, operation).await
    }

    /// Retries once per second until `timeout_secs` have elapsed.
    pub async fn retry_until_deadline<F, Fut>(
        &self,
        timeout_secs: f64,
        operation: F,
    ) -> RetryResult<Fut::Output>
    where
        F: FnMut() -> Fut,
        Fut: Future,
        Fut::Output: IntoAttempt,
    {
        let policy = RetryPolicy::deadline(timeout_secs)?;
        self.run(&policy, operation).await
    }

    /// Runs `operation` under `policy`.
    pub async fn run<F, Fut>(
        &self,
        policy: &RetryPolicy,
        mut operation: F,
    ) -> RetryResult<Fut::Output>
    where
        F: FnMut() -> Fut,
        Fut: Future,
        Fut::Output: IntoAttempt,
    {
        policy.validate()?;

        let mut schedule = Schedule::new(*policy);
        let start = self.clock.now();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);

            let last_failure = match operation().await.into_attempt() {
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

            self.sleeper.sleep(delay).await;

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

/// Result of an attempt guarded by [`catch_panics_async`].
pub type GuardedAttempt<R> =
    Result<<R as IntoAttempt>::Success, AttemptFault<<R as IntoAttempt>::Failure>>;

/// Awaits one attempt, turning a panic into [`AttemptFault::Panicked`].
///
/// Use inside the operation closure: `|| catch_panics_async(fetch())`.
pub async fn catch_panics_async<Fut>(attempt: Fut) -> GuardedAttempt<Fut::Output>
where
    Fut: Future,
    Fut::Output: IntoAttempt,
{
    match AssertUnwindSafe(attempt).catch_unwind().await {
        Ok(result) => result.into_attempt().map_err(AttemptFault::Failed),
        Err(payload) => Err(AttemptFault::Panicked(panic_message(payload.as_ref()))),
    }
}
