//! Declared option names.

use super::names::normalize_name;
use std::collections::HashSet;

/// The set of long options a parser knows to be flags or value-taking.
///
/// Names are stored normalized. Registering replaces the previous set of
/// the same kind; there is no merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionRegistry {
    known_flags: HashSet<String>,
    known_values: HashSet<String>,
}

impl OptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the declared flags.
    pub fn set_flags<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_flags = names
            .into_iter()
            .map(|n| normalize_name(n.as_ref()))
            .collect();
    }

    /// Replaces the declared value options.
    pub fn set_values<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_values = names
            .into_iter()
            .map(|n| normalize_name(n.as_ref()))
            .collect();
    }

    /// Returns true if the normalized name is a declared flag.
    #[must_use]
    pub fn is_flag(&self, key: &str) -> bool {
        self.known_flags.contains(key)
    }

    /// Returns true if the normalized name is a declared value option.
    #[must_use]
    pub fn is_value(&self, key: &str) -> bool {
        self.known_values.contains(key)
    }

    /// Declared flag names.
    #[must_use]
    pub fn flags(&self) -> &HashSet<String> {
        &self.known_flags
    }

    /// Declared value option names.
    #[must_use]
    pub fn values(&self) -> &HashSet<String> {
        &self.known_values
    }
}
