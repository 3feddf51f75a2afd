//! Command-line argument parsing.
//!
//! This module provides:
//! - Shape-based token classification (`--name=value`, `--name`, `-abc`, bare words)
//! - A per-parser registry of declared flags and value options
//! - Lookups that fall back to environment variables

mod env;
mod names;
mod parsed;
mod parser;
mod registry;
mod token;

#[cfg(test)]
pub use env::MockEnvironmentLookup;
pub use env::{EnvironmentLookup, MapEnvironment, ProcessEnvironment};
pub use names::{env_var_name, normalize_name};
pub use parsed::ParsedArguments;
pub use parser::{ArgParser, FLAG_SET};
pub use registry::OptionRegistry;
pub use token::{classify, Token};
