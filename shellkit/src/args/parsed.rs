//! The result of a single parse.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Flags, values and positionals produced by [`ArgParser::parse`].
///
/// [`ArgParser::parse`]: super::ArgParser::parse
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArguments {
    /// Normalized names of flags that were present.
    pub flags: HashSet<String>,
    /// Option values keyed by normalized name. Last occurrence wins.
    pub values: HashMap<String, String>,
    /// Positional arguments in order of appearance.
    pub positionals: Vec<String>,
}

impl ParsedArguments {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the normalized flag was present.
    #[must_use]
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }

    /// Returns the value for a normalized option name.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the positional at `index`.
    #[must_use]
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Returns true if nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.values.is_empty() && self.positionals.is_empty()
    }

    /// Converts to a dictionary representation.
    ///
    /// Flags are sorted so the output is stable.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut flags: Vec<&String> = self.flags.iter().collect();
        flags.sort();

        let values: serde_json::Map<String, serde_json::Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        let mut map = HashMap::new();
        map.insert("flags".to_string(), serde_json::json!(flags));
        map.insert("values".to_string(), serde_json::Value::Object(values));
        map.insert("positionals".to_string(), serde_json::json!(self.positionals));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedArguments {
        let mut parsed = ParsedArguments::new();
        parsed.flags.insert("verbose".to_string());
        parsed.flags.insert("force".to_string());
        parsed.values.insert("output".to_string(), "out.txt".to_string());
        parsed.positionals.push("src".to_string());
        parsed
    }

    #[test]
    fn test_accessors() {
        let parsed = sample();
        assert!(parsed.has_flag("force"));
        assert_eq!(parsed.value("output"), Some("out.txt"));
        assert_eq!(parsed.positional(0), Some("src"));
        assert_eq!(parsed.positional(1), None);
        assert!(!parsed.is_empty());
        assert!(ParsedArguments::new().is_empty());
    }

    #[test]
    fn test_to_dict_sorts_flags() {
        let dict = sample().to_dict();
        assert_eq!(dict.get("flags").unwrap(), &serde_json::json!(["force", "verbose"]));
        assert_eq!(dict.get("values").unwrap()["output"], "out.txt");
        assert_eq!(dict.get("positionals").unwrap(), &serde_json::json!(["src"]));
    }

    #[test]
    fn test_serde_roundtrip_preserves_positional_order() {
        let mut parsed = sample();
        parsed.positionals.push("dst".to_string());

        let json = serde_json::to_string(&parsed).unwrap();
        let back: ParsedArguments = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }
}
