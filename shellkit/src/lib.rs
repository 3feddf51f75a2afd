//! # Shellkit
//!
//! Building blocks for command-line tools that used to be shell scripts.
//!
//! Shellkit provides:
//!
//! - **Argument parsing**: flags, `--key value` options and positionals,
//!   with environment-variable fallback for lookups
//! - **Retry execution**: fixed-delay, exponential-backoff and
//!   wall-clock-deadline policies for fallible operations
//! - **Cancellation**: a shared token that stops retry loops between attempts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shellkit::prelude::*;
//!
//! let mut parser = ArgParser::new();
//! parser.register_flags(["verbose"]).register_values(["host"]);
//! parser.parse(std::env::args().skip(1));
//!
//! let host = parser.get_value("host", Some("localhost"));
//! let outcome = retry_with_backoff(5, 1.0, 30.0, || {
//!     std::net::TcpStream::connect((host.as_str(), 22))
//! })?;
//!
//! if !outcome.is_success() {
//!     eprintln!("{host} unreachable after {} attempts", outcome.attempts());
//! }
//! # Ok::<(), shellkit::errors::ShellkitError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod args;
pub mod cancellation;
pub mod errors;
pub mod logging;
pub mod retry;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::args::{ArgParser, EnvironmentLookup, MapEnvironment, ParsedArguments};
    pub use crate::cancellation::CancellationToken;
    pub use crate::errors::{ArgError, RetryError, ShellkitError};
    pub use crate::logging::{init_logging, LoggingConfig};
    pub use crate::retry::{
        catch_panics, retry_fixed, retry_until_deadline, retry_with_backoff, RetryConfig,
        RetryExecutor, RetryOutcome, RetryPolicy,
    };

    #[cfg(feature = "async")]
    pub use crate::retry::AsyncRetryExecutor;
}
