//! Error types for shellkit.
//!
//! Argument lookups and retry policy validation each have their own error
//! enum; `ShellkitError` aggregates them for callers that want a single type.
//! Retry exhaustion is not an error here: it is reported through
//! [`RetryOutcome`](crate::retry::RetryOutcome) so the last failure can be
//! inspected.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for shellkit operations.
#[derive(Debug, Error)]
pub enum ShellkitError {
    /// An argument lookup failed.
    #[error("{0}")]
    Args(#[from] ArgError),

    /// A retry policy was rejected.
    #[error("{0}")]
    Retry(#[from] RetryError),

    /// Configuration could not be loaded or was invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The logging subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Errors returned by [`ArgParser`](crate::args::ArgParser) lookups.
///
/// Parsing itself never fails; only lookups do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// Neither the command line nor the environment supplied the option.
    #[error("Option not set: {name}")]
    NotSet {
        /// The normalized option name.
        name: String,
    },

    /// A positional index past the end was requested.
    #[error("Positional argument {index} out of range ({count} available)")]
    OutOfRange {
        /// The requested zero-based index.
        index: usize,
        /// The number of positionals parsed.
        count: usize,
    },

    /// A value was present but could not be converted to the requested type.
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        /// The normalized option name.
        name: String,
        /// The raw value.
        value: String,
        /// Why conversion failed.
        reason: String,
    },
}

impl ArgError {
    /// Creates a not-set error.
    #[must_use]
    pub fn not_set(name: impl Into<String>) -> Self {
        Self::NotSet { name: name.into() }
    }

    /// Creates an out-of-range error.
    #[must_use]
    pub fn out_of_range(index: usize, count: usize) -> Self {
        Self::OutOfRange { index, count }
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::NotSet { name } => {
                map.insert("type".to_string(), serde_json::json!("NotSet"));
                map.insert("name".to_string(), serde_json::json!(name));
            }
            Self::OutOfRange { index, count } => {
                map.insert("type".to_string(), serde_json::json!("OutOfRange"));
                map.insert("index".to_string(), serde_json::json!(index));
                map.insert("count".to_string(), serde_json::json!(count));
            }
            Self::InvalidValue { name, value, reason } => {
                map.insert("type".to_string(), serde_json::json!("InvalidValue"));
                map.insert("name".to_string(), serde_json::json!(name));
                map.insert("value".to_string(), serde_json::json!(value));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Errors returned by the retry executors before any attempt is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// Policy parameters failed validation.
    #[error("Invalid retry policy: {reason}")]
    InvalidPolicy {
        /// What was wrong with the policy.
        reason: String,
    },
}

impl RetryError {
    /// Creates an invalid policy error.
    #[must_use]
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            reason: reason.into(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        match self {
            Self::InvalidPolicy { reason } => {
                map.insert("type".to_string(), serde_json::json!("InvalidPolicy"));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
        }
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_set_message() {
        let err = ArgError::not_set("dry_run");
        assert_eq!(err.to_string(), "Option not set: dry_run");
    }

    #[test]
    fn test_out_of_range_to_dict() {
        let err = ArgError::out_of_range(3, 1);
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "OutOfRange");
        assert_eq!(dict.get("index").unwrap(), 3);
        assert_eq!(dict.get("count").unwrap(), 1);
    }

    #[test]
    fn test_invalid_value_to_dict() {
        let err = ArgError::invalid_value("port", "abc", "invalid digit found in string");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "InvalidValue");
        assert_eq!(dict.get("value").unwrap(), "abc");
        assert!(dict.get("message").unwrap().as_str().unwrap().contains("port"));
    }

    #[test]
    fn test_invalid_policy_to_dict() {
        let err = RetryError::invalid_policy("max_attempts must be >= 1");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "InvalidPolicy");
        assert_eq!(dict.get("reason").unwrap(), "max_attempts must be >= 1");
    }

    #[test]
    fn test_shellkit_error_from_conversions() {
        let err: ShellkitError = ArgError::not_set("x").into();
        assert!(matches!(err, ShellkitError::Args(ArgError::NotSet { .. })));

        let err: ShellkitError = RetryError::invalid_policy("bad").into();
        assert_eq!(err.to_string(), "Invalid retry policy: bad");
    }
}
