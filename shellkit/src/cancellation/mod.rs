//! Cooperative cancellation for retry loops.

mod token;

pub use token::CancellationToken;
