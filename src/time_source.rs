//! Time source abstraction for supporting both real and manually-driven time.
//!
//! All of wakeguard's waiting is bounded-sleep-then-repoll, so routing `now`
//! and `sleep` through one abstraction lets the scheduler and session loops
//! run against a manually-advanced clock in tests: a four-hour session
//! completes instantly while keeping its pulse cadence observable.

use chrono::{DateTime, Local};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Process-wide time source; `None` means real system time.
static TIME_SOURCE: RwLock<Option<Arc<dyn TimeSource>>> = RwLock::new(None);

/// Trait for abstracting time operations.
pub trait TimeSource: Send + Sync {
    /// Get the current local time.
    fn now(&self) -> DateTime<Local>;

    /// Sleep for the specified duration (or advance a simulated clock).
    fn sleep(&self, duration: Duration);

    /// Check if this is a simulated time source.
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Real-time implementation backed by the system clock.
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

fn source() -> Arc<dyn TimeSource> {
    if let Some(src) = TIME_SOURCE.read().unwrap().as_ref() {
        return Arc::clone(src);
    }
    Arc::new(RealTimeSource)
}

/// Get the current local time from the active source.
pub fn now() -> DateTime<Local> {
    source().now()
}

/// Sleep on the active source.
pub fn sleep(duration: Duration) {
    source().sleep(duration);
}

/// Check whether a simulated source is active.
pub fn is_simulated() -> bool {
    source().is_simulated()
}

/// Replace the process-wide time source. Tests using this must run serially.
#[cfg(any(test, feature = "testing-support"))]
pub fn override_time_source(src: Arc<dyn TimeSource>) {
    *TIME_SOURCE.write().unwrap() = Some(src);
}

/// Restore the real system clock.
#[cfg(any(test, feature = "testing-support"))]
pub fn reset_time_source() {
    *TIME_SOURCE.write().unwrap() = None;
}

/// Manually-advanced time source for deterministic loop tests.
///
/// `sleep` advances the clock by the requested duration instead of blocking,
/// so tick-bounded polling loops run to completion immediately while every
/// `now()` reading stays consistent with the simulated timeline.
#[cfg(any(test, feature = "testing-support"))]
pub struct ManualTimeSource {
    current: std::sync::Mutex<DateTime<Local>>,
}

#[cfg(any(test, feature = "testing-support"))]
impl ManualTimeSource {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            current: std::sync::Mutex::new(start),
        }
    }
}

#[cfg(any(test, feature = "testing-support"))]
impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap();
        *current +=
            chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
    }

    fn is_simulated(&self) -> bool {
        true
    }
}
