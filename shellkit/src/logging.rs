//! Subscriber setup for the `tracing` events emitted by this crate.
//!
//! Library code only emits events. Binaries that want to see them call
//! [`init_logging`] once at startup.
//!
//! Priority order (highest to lowest):
//! 1. `SHELLKIT_LOG` / `SHELLKIT_LOG_FORMAT` environment variables
//! 2. The supplied [`LoggingConfig`]
//! 3. Defaults (`info`, text, colored)

use crate::args::{EnvironmentLookup, ProcessEnvironment};
use crate::errors::ShellkitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{
    fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV: &str = "SHELLKIT_LOG";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "SHELLKIT_LOG_FORMAT";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ShellkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ShellkitError::Config(format!(
                "invalid log format '{other}' (must be 'json' or 'text')"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level or filter directives: trace, debug, info, warn, error, off,
    /// or e.g. `shellkit::retry=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Colored output (text format only).
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            ansi: default_true(),
        }
    }
}

impl LoggingConfig {
    /// Sets the level directives.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables or disables colors.
    #[must_use]
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Installs a global subscriber writing to stderr.
///
/// Fails with [`ShellkitError::Logging`] if a subscriber is already set.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ShellkitError> {
    init_logging_with(config, &ProcessEnvironment)
}

/// Like [`init_logging`], reading overrides from `env`.
pub fn init_logging_with<E: EnvironmentLookup>(
    config: Option<&LoggingConfig>,
    env: &E,
) -> Result<(), ShellkitError> {
    let filter = build_env_filter(config, env)?;
    let format = determine_format(config, env)?;
    let ansi = config.map_or(true, |c| c.ansi);

    let base = Registry::default().with(filter);
    let result = match format {
        LogFormat::Json => base
            .with(
                fmt_layer::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Text => base
            .with(
                fmt_layer::layer()
                    .with_target(true)
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| ShellkitError::Logging(format!("failed to install subscriber: {e}")))
}

/// Builds the event filter from `SHELLKIT_LOG` or the configured level.
pub fn build_env_filter<E: EnvironmentLookup>(
    config: Option<&LoggingConfig>,
    env: &E,
) -> Result<EnvFilter, ShellkitError> {
    if let Some(directives) = env.get(LOG_ENV).filter(|d| !d.trim().is_empty()) {
        return EnvFilter::try_new(&directives)
            .map_err(|e| ShellkitError::Config(format!("invalid {LOG_ENV} '{directives}': {e}")));
    }

    let level = config.map_or("info", |c| c.level.as_str());
    EnvFilter::try_new(level)
        .map_err(|e| ShellkitError::Config(format!("invalid log level '{level}': {e}")))
}

/// Picks the output format; `SHELLKIT_LOG_FORMAT` wins over the config.
pub fn determine_format<E: EnvironmentLookup>(
    config: Option<&LoggingConfig>,
    env: &E,
) -> Result<LogFormat, ShellkitError> {
    match env.get(LOG_FORMAT_ENV).filter(|f| !f.trim().is_empty()) {
        Some(raw) => raw.parse(),
        None => Ok(config.map(|c| c.format).unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::MapEnvironment;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Text);
        assert!(config.ansi);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_filter_from_config() {
        let config = LoggingConfig::default().with_level("shellkit::retry=debug,warn");
        let filter = build_env_filter(Some(&config), &MapEnvironment::new()).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("shellkit::retry=debug"));
    }

    #[test]
    fn test_filter_env_overrides_config() {
        let env = MapEnvironment::new().with_var(LOG_ENV, "trace");
        let config = LoggingConfig::default().with_level("error");
        let filter = build_env_filter(Some(&config), &env).unwrap();
        assert_eq!(filter.to_string(), "trace");
    }

    #[test]
    fn test_filter_rejects_bad_directive() {
        let config = LoggingConfig::default().with_level("shellkit=loud");
        assert!(matches!(
            build_env_filter(Some(&config), &MapEnvironment::new()),
            Err(ShellkitError::Config(_))
        ));
    }

    #[test]
    fn test_format_selection() {
        let none = MapEnvironment::new();
        assert_eq!(determine_format(None, &none).unwrap(), LogFormat::Text);

        let config = LoggingConfig::default().with_format(LogFormat::Json);
        assert_eq!(determine_format(Some(&config), &none).unwrap(), LogFormat::Json);

        let env = MapEnvironment::new().with_var(LOG_FORMAT_ENV, "TEXT");
        assert_eq!(determine_format(Some(&config), &env).unwrap(), LogFormat::Text);

        let env = MapEnvironment::new().with_var(LOG_FORMAT_ENV, "xml");
        assert!(determine_format(None, &env).is_err());
    }
}
