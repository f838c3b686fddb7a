//! Clock abstraction
//!
//! The capture loop and the chunked writer measure elapsed time through a
//! trait so rotation and cadence behavior can be tested with a manual
//! clock instead of real sleeps.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by `std::time` and `std::thread::sleep`
#[derive(Debug, Default)]
pub struct RealClock;

impl RealClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Manual clock for deterministic tests.
///
/// `sleep` advances virtual time instead of blocking, so a loop driven by
/// this clock runs as fast as the test can execute.
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Advance virtual time by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut offset = self.offset.lock().expect("clock mutex poisoned");
        *offset += duration;
    }

    /// Total virtual time elapsed since construction
    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().expect("clock mutex poisoned")
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().expect("clock mutex poisoned")
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
