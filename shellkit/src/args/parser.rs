//! The argument parser.

use super::env::{EnvironmentLookup, ProcessEnvironment};
use super::names::{env_var_name, normalize_name};
use super::parsed::ParsedArguments;
use super::registry::OptionRegistry;
use super::token::{classify, Token};
use crate::errors::ArgError;
use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::{debug, trace};

/// Value returned by [`ArgParser::get_flag`] for a present flag when no
/// fallback is given.
pub const FLAG_SET: &str = "true";

/// Tokenizes argument lists into flags, values and positionals.
///
/// A parser owns its [`OptionRegistry`], its usage text and the result of
/// the most recent [`parse`](Self::parse). Lookups fall back to environment
/// variables through the injected [`EnvironmentLookup`].
///
/// Parsing mutates the parser, so sharing one instance between threads
/// needs external synchronization (e.g. a mutex around it).
///
/// # Unrecognized long options
///
/// A `--name` that is neither a declared flag nor a declared value option
/// takes the following token as its value when that token exists and does
/// not start with `-`; otherwise it becomes a flag. A declared value option
/// at the end of the list also becomes a flag.
///
/// # Examples
///
/// ```
/// use shellkit::args::{ArgParser, MapEnvironment};
///
/// let mut parser = ArgParser::with_environment(MapEnvironment::new());
/// parser.register_flags(["--force"]).register_values(["--output"]);
/// parser.parse(["--force", "--output", "out.txt", "src"]);
///
/// assert_eq!(parser.get_flag("--force", None).unwrap(), "true");
/// assert_eq!(parser.get_value("--output", None), "out.txt");
/// assert_eq!(parser.get_positional(0).unwrap(), "src");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgParser<E = ProcessEnvironment> {
    registry: OptionRegistry,
    usage: String,
    parsed: ParsedArguments,
    env: E,
}

impl ArgParser<ProcessEnvironment> {
    /// Creates a parser that falls back to the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_environment(ProcessEnvironment)
    }
}

impl<E: EnvironmentLookup> ArgParser<E> {
    /// Creates a parser with a custom environment lookup.
    #[must_use]
    pub fn with_environment(env: E) -> Self {
        Self {
            registry: OptionRegistry::new(),
            usage: String::new(),
            parsed: ParsedArguments::new(),
            env,
        }
    }

    /// Declares which `--name` tokens are value-less flags.
    ///
    /// Replaces any previously declared flags.
    pub fn register_flags<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.set_flags(names);
        self
    }

    /// Declares which `--name` tokens consume the following token.
    ///
    /// Replaces any previously declared value options.
    pub fn register_values<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.registry.set_values(names);
        self
    }

    /// Stores the usage text.
    pub fn set_usage(&mut self, text: impl Into<String>) -> &mut Self {
        self.usage = text.into();
        self
    }

    /// Returns the usage text.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Writes the usage text followed by a newline.
    pub fn write_usage<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.usage)
    }

    /// Returns the environment lookup.
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Returns the environment lookup mutably.
    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Returns the option registry.
    #[must_use]
    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Parses an argument list, replacing the previous result.
    ///
    /// Parsing is total: every token ends up as a flag, a value or a
    /// positional.
    pub fn parse<I, S>(&mut self, args: I) -> &ParsedArguments
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let mut parsed = ParsedArguments::new();
        let mut i = 0;

        while i < args.len() {
            let raw = args[i].as_ref();
            let next = args.get(i + 1).map(AsRef::as_ref);

            match classify(raw) {
                Token::EndOfOptions => {
                    parsed
                        .positionals
                        .extend(args[i + 1..].iter().map(|a| a.as_ref().to_string()));
                    break;
                }
                Token::Assignment { name, value } => {
                    parsed.values.insert(normalize_name(name), value.to_string());
                }
                Token::Long(name) => {
                    let key = normalize_name(name);
                    let declared_value = self.registry.is_value(&key);
                    match next {
                        _ if key.is_empty() => parsed.positionals.push(raw.to_string()),
                        _ if self.registry.is_flag(&key) => {
                            parsed.flags.insert(key);
                        }
                        Some(value) if declared_value => {
                            parsed.values.insert(key, value.to_string());
                            i += 1;
                        }
                        Some(value) if !declared_value && !value.starts_with('-') => {
                            trace!(option = %key, "Unregistered option takes following value");
                            parsed.values.insert(key, value.to_string());
                            i += 1;
                        }
                        _ => {
                            trace!(option = %key, "Option without value treated as flag");
                            parsed.flags.insert(key);
                        }
                    }
                }
                Token::ShortGroup(letters) => {
                    for letter in letters.chars() {
                        parsed.flags.insert(letter.to_string());
                    }
                }
                Token::Bare(token) => parsed.positionals.push(token.to_string()),
            }

            i += 1;
        }

        debug!(
            flags = parsed.flags.len(),
            values = parsed.values.len(),
            positionals = parsed.positionals.len(),
            "Parsed arguments"
        );

        self.parsed = parsed;
        &self.parsed
    }

    /// Returns the result of the last parse.
    #[must_use]
    pub fn parsed(&self) -> &ParsedArguments {
        &self.parsed
    }

    /// Returns the positionals of the last parse.
    #[must_use]
    pub fn positionals(&self) -> &[String] {
        &self.parsed.positionals
    }

    /// Looks up a flag.
    ///
    /// A flag present on the command line yields `fallback`, or
    /// [`FLAG_SET`] when no fallback is given. Otherwise a non-empty
    /// environment variable (`--dry-run` reads `DRY_RUN`) yields its value.
    pub fn get_flag(&self, name: &str, fallback: Option<&str>) -> Result<String, ArgError> {
        let key = normalize_name(name);
        if self.parsed.has_flag(&key) {
            return Ok(fallback.unwrap_or(FLAG_SET).to_string());
        }
        self.env_value(name).ok_or_else(|| ArgError::not_set(key))
    }

    /// Returns true if the flag is set on the command line or in the
    /// environment.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.get_flag(name, None).is_ok()
    }

    /// Looks up an option value.
    ///
    /// Order: parsed value, non-empty environment variable, `default`,
    /// empty string. Never fails.
    #[must_use]
    pub fn get_value(&self, name: &str, default: Option<&str>) -> String {
        let key = normalize_name(name);
        if let Some(value) = self.parsed.value(&key) {
            return value.to_string();
        }
        self.env_value(name)
            .or_else(|| default.map(str::to_string))
            .unwrap_or_default()
    }

    /// Looks up an option value and converts it.
    ///
    /// Fails with [`ArgError::NotSet`] when no non-empty value is found and
    /// with [`ArgError::InvalidValue`] when conversion fails.
    pub fn value_as<T>(&self, name: &str) -> Result<T, ArgError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let key = normalize_name(name);
        let raw = self.get_value(name, None);
        if raw.is_empty() {
            return Err(ArgError::not_set(key));
        }
        let converted = raw.parse::<T>();
        converted.map_err(|e| ArgError::invalid_value(key, raw, e.to_string()))
    }

    /// Returns the positional at a zero-based index.
    pub fn get_positional(&self, index: usize) -> Result<&str, ArgError> {
        self.parsed
            .positional(index)
            .ok_or_else(|| ArgError::out_of_range(index, self.parsed.positionals.len()))
    }

    fn env_value(&self, name: &str) -> Option<String> {
        self.env
            .get(&env_var_name(name))
            .filter(|value| !value.is_empty())
    }
}
