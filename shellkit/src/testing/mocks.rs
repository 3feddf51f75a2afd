//! Deterministic collaborators for retry tests.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use crate::retry::{Clock, Sleeper};

/// A clock that only moves when told to.
///
/// Implements both [`Clock`] and [`Sleeper`]: sleeping records the pause
/// and advances the clock by it, so deadline runs finish instantly.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Creates a clock at an arbitrary fixed origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Moves the clock forward without recording a sleep.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock();
        *offset = offset.saturating_add(by);
    }

    /// Time elapsed since the origin.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock()
    }

    /// Pauses requested so far, in order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock()
    }
}

impl Sleeper for ManualClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration);
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl crate::retry::AsyncSleeper for ManualClock {
    async fn sleep(&self, duration: Duration) {
        Sleeper::sleep(self, duration);
    }
}

/// A sleeper that records pauses and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far, in order.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    /// Pauses in whole seconds, for compact assertions.
    #[must_use]
    pub fn sleeps_secs(&self) -> Vec<u64> {
        self.sleeps.lock().iter().map(Duration::as_secs).collect()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
    }
}

/// An operation that fails until a chosen attempt and counts its calls.
#[derive(Debug)]
pub struct ScriptedOperation {
    succeed_on: Option<u32>,
    calls: AtomicU32,
}

impl ScriptedOperation {
    /// An operation that never succeeds.
    #[must_use]
    pub fn always_failing() -> Self {
        Self {
            succeed_on: None,
            calls: AtomicU32::new(0),
        }
    }

    /// An operation that succeeds on call `attempt` (1-based) and after.
    #[must_use]
    pub fn succeeding_on(attempt: u32) -> Self {
        Self {
            succeed_on: Some(attempt),
            calls: AtomicU32::new(0),
        }
    }

    /// Invokes the operation.
    ///
    /// Returns the call number on success and a message naming it on
    /// failure.
    pub fn call(&self) -> Result<u32, String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.succeed_on {
            Some(target) if call >= target => Ok(call),
            _ => Err(format!("attempt {call} failed")),
        }
    }

    /// Number of times [`call`](Self::call) ran.
    #[must_use]
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}
