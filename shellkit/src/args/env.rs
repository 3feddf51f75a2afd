//! Environment lookup capability used for option fallbacks.

use std::collections::HashMap;

/// Read-only access to environment variables.
///
/// Injected into [`ArgParser`](super::ArgParser) so lookups can be tested
/// without touching the real process environment.
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentLookup {
    /// Returns the value of `name`, or `None` when unset.
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentLookup for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// An in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Sets a variable in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Removes a variable.
    pub fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }
}

impl EnvironmentLookup for MapEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl FromIterator<(String, String)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl<T: EnvironmentLookup + ?Sized> EnvironmentLookup for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_environment_lookup() {
        let env = MapEnvironment::new().with_var("OUTPUT", "out.txt");
        assert_eq!(env.get("OUTPUT"), Some("out.txt".to_string()));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn test_map_environment_set_and_remove() {
        let mut env = MapEnvironment::new();
        env.set("VERBOSE", "1");
        assert_eq!(env.get("VERBOSE"), Some("1".to_string()));

        env.remove("VERBOSE");
        assert_eq!(env.get("VERBOSE"), None);
    }

    #[test]
    fn test_map_environment_from_iterator() {
        let env: MapEnvironment = vec![("A".to_string(), "1".to_string())].into_iter().collect();
        assert_eq!(env.get("A"), Some("1".to_string()));
    }

    #[test]
    fn test_process_environment_unset_variable() {
        assert!(ProcessEnvironment
            .get("SHELLKIT_DEFINITELY_NOT_SET_8F3A")
            .is_none());
    }

    #[test]
    fn test_reference_delegates() {
        let env = MapEnvironment::new().with_var("X", "y");
        let by_ref: &MapEnvironment = &env;
        assert_eq!(EnvironmentLookup::get(&by_ref, "X"), Some("y".to_string()));
    }
}
