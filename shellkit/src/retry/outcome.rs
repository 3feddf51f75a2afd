//! Attempt results and run outcomes.

use std::process::ExitStatus;

/// Interprets an operation's return value as success or failure.
///
/// Implemented for `Result`, `bool` (`false` fails), `i32` exit codes
/// (non-zero fails) and [`ExitStatus`].
pub trait IntoAttempt {
    /// What a successful attempt yields.
    type Success;
    /// The failure indicator kept for diagnostics.
    type Failure;

    /// Splits the value into success or failure.
    fn into_attempt(self) -> Result<Self::Success, Self::Failure>;
}

impl<T, E> IntoAttempt for Result<T, E> {
    type Success = T;
    type Failure = E;

    fn into_attempt(self) -> Result<T, E> {
        self
    }
}

impl IntoAttempt for bool {
    type Success = ();
    type Failure = ();

    fn into_attempt(self) -> Result<(), ()> {
        if self {
            Ok(())
        } else {
            Err(())
        }
    }
}

impl IntoAttempt for i32 {
    type Success = ();
    type Failure = i32;

    fn into_attempt(self) -> Result<(), i32> {
        if self == 0 {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoAttempt for ExitStatus {
    type Success = ExitStatus;
    type Failure = ExitStatus;

    fn into_attempt(self) -> Result<ExitStatus, ExitStatus> {
        if self.success() {
            Ok(self)
        } else {
            Err(self)
        }
    }
}

/// How a retry run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<S, F> {
    /// An attempt succeeded.
    Success {
        /// The successful attempt's value.
        value: S,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// The attempt or time budget ran out.
    Exhausted {
        /// Failure indicator of the final attempt.
        last_failure: F,
        /// Attempts made.
        attempts: u32,
    },
    /// A cancellation token fired between attempts.
    Cancelled {
        /// Failure indicator of the final attempt.
        last_failure: F,
        /// Attempts made.
        attempts: u32,
    },
}

impl<S, F> RetryOutcome<S, F> {
    /// Returns true for [`RetryOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true for [`RetryOutcome::Exhausted`].
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }

    /// Returns true for [`RetryOutcome::Cancelled`].
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Number of times the operation was invoked.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// The last failure, if the run did not succeed.
    #[must_use]
    pub fn last_failure(&self) -> Option<&F> {
        match self {
            Self::Success { .. } => None,
            Self::Exhausted { last_failure, .. } | Self::Cancelled { last_failure, .. } => {
                Some(last_failure)
            }
        }
    }

    /// Converts into the success value or the last failure.
    pub fn into_result(self) -> Result<S, F> {
        match self {
            Self::Success { value, .. } => Ok(value),
            Self::Exhausted { last_failure, .. } | Self::Cancelled { last_failure, .. } => {
                Err(last_failure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_attempts() {
        assert_eq!(true.into_attempt(), Ok(()));
        assert_eq!(false.into_attempt(), Err(()));
    }

    #[test]
    fn test_exit_code_attempts() {
        assert_eq!(0_i32.into_attempt(), Ok(()));
        assert_eq!(127_i32.into_attempt(), Err(127));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: RetryOutcome<&str, i32> = RetryOutcome::Success {
            value: "done",
            attempts: 2,
        };
        assert!(ok.is_success());
        assert_eq!(ok.attempts(), 2);
        assert_eq!(ok.last_failure(), None);
        assert_eq!(ok.into_result(), Ok("done"));

        let exhausted: RetryOutcome<(), i32> = RetryOutcome::Exhausted {
            last_failure: 3,
            attempts: 5,
        };
        assert!(exhausted.is_exhausted());
        assert_eq!(exhausted.last_failure(), Some(&3));
        assert_eq!(exhausted.into_result(), Err(3));
    }

    #[test]
    fn test_cancelled_outcome() {
        let cancelled: RetryOutcome<(), &str> = RetryOutcome::Cancelled {
            last_failure: "timeout",
            attempts: 1,
        };
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_success());
        assert_eq!(cancelled.into_result(), Err("timeout"));
    }
}
