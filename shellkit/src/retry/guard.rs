//! Turning panicking attempts into ordinary failures.

use super::outcome::IntoAttempt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Why a guarded attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFault<E> {
    /// The operation reported failure.
    Failed(E),
    /// The operation panicked; carries the panic message.
    Panicked(String),
}

impl<E> AttemptFault<E> {
    /// Returns true if the attempt panicked.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

/// Wraps an operation so that a panic counts as a failed attempt.
///
/// Without this wrapper a panic unwinds through the executor.
///
/// # Examples
///
/// ```
/// use shellkit::retry::{catch_panics, AttemptFault, RetryExecutor};
///
/// let mut calls = 0;
/// let outcome = RetryExecutor::new()
///     .retry_fixed(2, 0.0, catch_panics(|| {
///         calls += 1;
///         if calls == 1 {
///             panic!("flaky");
///         }
///         Ok::<_, String>(calls)
///     }))
///     .unwrap();
///
/// assert_eq!(outcome.into_result(), Ok(2));
/// ```
pub fn catch_panics<F, R>(
    mut operation: F,
) -> impl FnMut() -> Result<R::Success, AttemptFault<R::Failure>>
where
    F: FnMut() -> R,
    R: IntoAttempt,
{
    move || match panic::catch_unwind(AssertUnwindSafe(|| operation())) {
        Ok(result) => result.into_attempt().map_err(AttemptFault::Failed),
        Err(payload) => Err(AttemptFault::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        let mut guarded = catch_panics(|| Ok::<_, ()>(7));
        assert_eq!(guarded(), Ok(7));
    }

    #[test]
    fn test_failure_is_wrapped() {
        let mut guarded = catch_panics(|| 2_i32);
        assert_eq!(guarded(), Err(AttemptFault::Failed(2)));
    }

    #[test]
    fn test_panic_is_captured() {
        let mut guarded = catch_panics(|| -> bool { panic!("boom") });
        let fault = guarded().unwrap_err();

        assert!(fault.is_panic());
        assert_eq!(fault, AttemptFault::Panicked("boom".to_string()));
    }

    #[test]
    fn test_formatted_panic_message() {
        let code = 3;
        let mut guarded = catch_panics(|| -> bool { panic!("exit {code}") });
        assert_eq!(guarded(), Err(AttemptFault::Panicked("exit 3".to_string())));
    }
}
