//! Cancellation token for stopping retry runs between attempts.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// A token for cooperative cancellation of retry runs.
///
/// Executors check the token after a failed attempt and again after the
/// pause; an attempt already running is never interrupted. Cancellation is
/// idempotent and only the first reason is kept.
#[derive(Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    reason: RwLock<Option<String>>,
}

impl CancellationToken {
    /// Creates a new token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation with a reason.
    ///
    /// The reason is stored before the flag is raised, so a caller that
    /// observes [`is_cancelled`](Self::is_cancelled) always finds it.
    pub fn cancel(&self, reason: impl Into<String>) {
        let mut slot = self.reason.write();
        if slot.is_none() {
            *slot = Some(reason.into());
            self.cancelled.store(true, Ordering::SeqCst);
        }
    }

    /// Returns whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the cancellation reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.reason.read().clone()
    }

    /// Clears the token so it can be reused.
    pub fn reset(&self) {
        let mut slot = self.reason.write();
        self.cancelled.store(false, Ordering::SeqCst);
        *slot = None;
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_token_default_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.reason().is_none());
    }

    #[test]
    fn test_first_reason_wins() {
        let token = CancellationToken::new();
        token.cancel("shutdown");
        token.cancel("second");

        assert!(token.is_cancelled());
        assert_eq!(token.reason(), Some("shutdown".to_string()));
    }

    #[test]
    fn test_reset() {
        let token = CancellationToken::new();
        token.cancel("x");
        token.reset();

        assert!(!token.is_cancelled());
        assert!(token.reason().is_none());
    }

    #[test]
    fn test_reason_visible_once_cancelled() {
        for _ in 0..200 {
            let token = Arc::new(CancellationToken::new());
            let writer = Arc::clone(&token);
            let handle = std::thread::spawn(move || writer.cancel("shutdown"));

            while !token.is_cancelled() {
                std::hint::spin_loop();
            }
            assert_eq!(token.reason(), Some("shutdown".to_string()));
            handle.join().unwrap();
        }
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let token = Arc::new(CancellationToken::new());
        let remote = Arc::clone(&token);

        std::thread::spawn(move || remote.cancel("signal"))
            .join()
            .unwrap();

        assert!(token.is_cancelled());
        assert!(format!("{token:?}").contains("signal"));
    }
}
