//! Option name normalization.
//!
//! `--dry-run`, `-dry-run`, `dry-run` and `dry_run` all refer to the same
//! canonical key `dry_run`, whose environment variable is `DRY_RUN`.

/// Returns the canonical key for an option name.
///
/// All leading dashes are stripped and remaining dashes become underscores.
///
/// # Examples
///
/// ```
/// use shellkit::args::normalize_name;
///
/// assert_eq!(normalize_name("--dry-run"), "dry_run");
/// assert_eq!(normalize_name("dry_run"), "dry_run");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim_start_matches('-').replace('-', "_")
}

/// Returns the environment variable consulted for an option name.
///
/// # Examples
///
/// ```
/// use shellkit::args::env_var_name;
///
/// assert_eq!(env_var_name("--log-level"), "LOG_LEVEL");
/// ```
#[must_use]
pub fn env_var_name(name: &str) -> String {
    normalize_name(name).to_uppercase()
}
