//! Retry execution with fixed, exponential backoff and deadline policies.
//!
//! This module provides:
//! - Validated retry policies and the per-run delay schedule
//! - Synchronous and async executors with injectable clock and sleep
//! - Serializable configuration loadable from the environment
//! - A guard that turns panicking attempts into failures

#[cfg(feature = "async")]
mod asynchronous;
mod clock;
mod config;
mod executor;
mod guard;
mod outcome;
mod policy;

#[cfg(feature = "async")]
pub use asynchronous::{
    catch_panics_async, AsyncRetryExecutor, AsyncSleeper, GuardedAttempt, TokioSleeper,
};
pub use clock::{Clock, Sleeper, SystemClock, ThreadSleeper};
pub use config::{RetryConfig, RetryMode, ENV_PREFIX};
pub use executor::{
    retry_fixed, retry_until_deadline, retry_with_backoff, RetryExecutor, RetryResult,
};
pub use guard::{catch_panics, AttemptFault};
pub use outcome::{IntoAttempt, RetryOutcome};
pub use policy::{RetryPolicy, Schedule, DEFAULT_POLL_INTERVAL};
