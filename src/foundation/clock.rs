//! Monotonic clocks used to time the export stages and the animation settle wait.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Monotonic time source with a blocking sleep.
///
/// `now` is measured from the clock's own epoch, so values from different clocks are not
/// comparable.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock epoch.
    fn now(&self) -> Duration;

    /// Block the current thread for `duration`.
    fn sleep(&self, duration: Duration);

    /// Sleep until `deadline` (no-op when it already passed).
    fn sleep_until(&self, deadline: Duration) {
        let now = self.now();
        if deadline > now {
            self.sleep(deadline - now);
        }
    }
}

/// Wall clock anchored to the moment it was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock: `sleep` advances time instantly.
///
/// Used by tests and batch exports where the settle wait should be accounted for without
/// actually blocking.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Create a manual clock at `t = 0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
