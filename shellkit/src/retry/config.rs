//! Serializable retry configuration.

use super::policy::RetryPolicy;
use crate::args::EnvironmentLookup;
use crate::errors::{RetryError, ShellkitError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of the environment variables read by [`RetryConfig::from_env`].
pub const ENV_PREFIX: &str = "SHELLKIT_RETRY_";

/// Which retry policy a configuration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Constant pause of `initial_delay_secs`.
    Fixed,
    /// Doubling pause from `initial_delay_secs` up to `max_delay_secs`.
    #[default]
    Backoff,
    /// Retry until `timeout_secs` elapse.
    Deadline,
}

impl FromStr for RetryMode {
    type Err = ShellkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "backoff" | "exponential" => Ok(Self::Backoff),
            "deadline" | "timeout" => Ok(Self::Deadline),
            other => Err(ShellkitError::Config(format!("unknown retry mode '{other}'"))),
        }
    }
}

impl fmt::Display for RetryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fixed => "fixed",
            Self::Backoff => "backoff",
            Self::Deadline => "deadline",
        };
        f.write_str(name)
    }
}

/// Retry settings as they appear in configuration files or the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Policy kind.
    #[serde(default)]
    pub mode: RetryMode,
    /// Attempt budget for fixed and backoff modes.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed pause, or first backoff pause, in seconds.
    #[serde(default = "default_initial_delay")]
    pub initial_delay_secs: f64,
    /// Backoff cap in seconds.
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: f64,
    /// Deadline budget in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: f64,
    /// Deadline poll interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> f64 {
    1.0
}

fn default_max_delay() -> f64 {
    60.0
}

fn default_timeout() -> f64 {
    30.0
}

fn default_poll_interval() -> f64 {
    1.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            mode: RetryMode::default(),
            max_attempts: default_max_attempts(),
            initial_delay_secs: default_initial_delay(),
            max_delay_secs: default_max_delay(),
            timeout_secs: default_timeout(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl RetryConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the first delay.
    #[must_use]
    pub fn with_initial_delay_secs(mut self, secs: f64) -> Self {
        self.initial_delay_secs = secs;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub fn with_max_delay_secs(mut self, secs: f64) -> Self {
        self.max_delay_secs = secs;
        self
    }

    /// Sets the deadline budget.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Parses a JSON document, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ShellkitError> {
        serde_json::from_str(json)
            .map_err(|e| ShellkitError::Config(format!("invalid retry config: {e}")))
    }

    /// Reads `SHELLKIT_RETRY_*` variables over the defaults.
    ///
    /// Recognized suffixes: `MODE`, `MAX_ATTEMPTS`, `INITIAL_DELAY`,
    /// `MAX_DELAY`, `TIMEOUT`, `POLL_INTERVAL`. Empty variables are ignored.
    pub fn from_env<E: EnvironmentLookup>(env: &E) -> Result<Self, ShellkitError> {
        let mut config = Self::default();

        if let Some(mode) = read(env, "MODE") {
            config.mode = mode.parse()?;
        }
        if let Some(raw) = read(env, "MAX_ATTEMPTS") {
            config.max_attempts = parse_number("MAX_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = read(env, "INITIAL_DELAY") {
            config.initial_delay_secs = parse_number("INITIAL_DELAY", &raw)?;
        }
        if let Some(raw) = read(env, "MAX_DELAY") {
            config.max_delay_secs = parse_number("MAX_DELAY", &raw)?;
        }
        if let Some(raw) = read(env, "TIMEOUT") {
            config.timeout_secs = parse_number("TIMEOUT", &raw)?;
        }
        if let Some(raw) = read(env, "POLL_INTERVAL") {
            config.poll_interval_secs = parse_number("POLL_INTERVAL", &raw)?;
        }

        Ok(config)
    }

    /// Builds and validates the policy this configuration describes.
    pub fn to_policy(&self) -> Result<RetryPolicy, RetryError> {
        match self.mode {
            RetryMode::Fixed => RetryPolicy::fixed(self.max_attempts, self.initial_delay_secs),
            RetryMode::Backoff => RetryPolicy::backoff(
                self.max_attempts,
                self.initial_delay_secs,
                self.max_delay_secs,
            ),
            RetryMode::Deadline => RetryPolicy::deadline(self.timeout_secs)?
                .with_poll_interval(self.poll_interval_secs),
        }
    }
}

fn read<E: EnvironmentLookup>(env: &E, suffix: &str) -> Option<String> {
    env.get(&format!("{ENV_PREFIX}{suffix}"))
        .filter(|value| !value.trim().is_empty())
}

fn parse_number<T>(suffix: &str, raw: &str) -> Result<T, ShellkitError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        ShellkitError::Config(format!("{ENV_PREFIX}{suffix}: '{raw}' is not a number ({e})"))
    })
}
