//! Session execution: the bounded-duration keepalive loop.
//!
//! A session draws its length at random from the configured bounds, then
//! polls on a short fixed tick until the end instant passes. Keepalive
//! pulses run on their own due-time cadence so they stay on schedule even
//! though the poll tick is much faster than the pulse interval.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration as ChronoDuration, Local};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::common::constants::{CMD_END_EARLY, CMD_QUIT, SESSION_TICK};
use crate::display::SessionObserver;
use crate::io::input::InputPoller;
use crate::sink::KeepaliveSink;
use crate::time_source;

/// Validated bounds for the random session duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationRange {
    min_minutes: u64,
    max_minutes: u64,
}

impl DurationRange {
    pub fn new(min_minutes: u64, max_minutes: u64) -> Result<Self> {
        if min_minutes == 0 || max_minutes == 0 {
            bail!("duration minutes must be > 0");
        }
        if max_minutes < min_minutes {
            bail!(
                "max duration ({max_minutes} minutes) must be >= min duration ({min_minutes} minutes)"
            );
        }
        Ok(Self {
            min_minutes,
            max_minutes,
        })
    }

    pub fn min_minutes(&self) -> u64 {
        self.min_minutes
    }

    pub fn max_minutes(&self) -> u64 {
        self.max_minutes
    }

    /// Draw a session length uniformly from the inclusive range.
    pub fn draw_minutes(&self) -> u64 {
        rand::rng().random_range(self.min_minutes..=self.max_minutes)
    }
}

/// One bounded-duration keepalive session, created at the moment it begins
/// and discarded when it ends.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub start: DateTime<Local>,
    pub duration_minutes: u64,
    pub end: DateTime<Local>,
    pub interval: Duration,
}

impl Session {
    fn begin(range: &DurationRange, interval: Duration) -> Self {
        let duration_minutes = range.draw_minutes();
        let start = time_source::now();
        let end = start + ChronoDuration::minutes(duration_minutes as i64);
        Self {
            start,
            duration_minutes,
            end,
            interval,
        }
    }

    fn total_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }
}

/// How a session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Ran to its scheduled end.
    Completed,
    /// The end-early command arrived; control returns to the wait phase.
    EndedEarly,
    /// The quit command or a termination signal arrived.
    QuitRequested,
}

/// Run one keepalive session to completion, early end, or quit.
///
/// Every tick the loop polls for a pending command and checks the shared
/// `running` flag; a quit takes effect within one tick. Pulse delivery
/// failures are logged and never abort the session.
pub fn run_session(
    range: &DurationRange,
    interval: Duration,
    progress_tick: Duration,
    sink: &mut dyn KeepaliveSink,
    poller: &mut dyn InputPoller,
    observer: &mut dyn SessionObserver,
    running: &AtomicBool,
) -> Result<SessionOutcome> {
    let interval_chrono =
        ChronoDuration::from_std(interval).context("pulse interval out of range")?;
    let progress_tick_chrono =
        ChronoDuration::from_std(progress_tick).context("progress tick out of range")?;

    let session = Session::begin(range, interval);
    let total_seconds = session.total_seconds();
    observer.session_started(&session);

    let mut next_pulse_due = session.start;
    let mut next_progress_due = session.start;

    loop {
        let now = time_source::now();
        if now >= session.end {
            break;
        }

        if !running.load(Ordering::SeqCst) {
            observer.quit_requested();
            return Ok(SessionOutcome::QuitRequested);
        }

        match poller.poll_command(&[CMD_QUIT, CMD_END_EARLY]) {
            Some(CMD_QUIT) => {
                observer.quit_requested();
                return Ok(SessionOutcome::QuitRequested);
            }
            Some(CMD_END_EARLY) => {
                observer.session_ended(time_source::now());
                return Ok(SessionOutcome::EndedEarly);
            }
            _ => {}
        }

        if now >= next_pulse_due {
            if let Err(e) = sink.pulse() {
                log_pipe!();
                log_warning!("Keepalive pulse failed: {e}");
            }
            next_pulse_due += interval_chrono;
        }

        if now >= next_progress_due {
            let remaining = (session.end - now).num_seconds().clamp(0, total_seconds);
            let elapsed = total_seconds - remaining;
            let percent = if total_seconds > 0 {
                (elapsed * 100 / total_seconds) as u8
            } else {
                0
            };
            observer.session_progress(percent, Duration::from_secs(remaining as u64));
            next_progress_due = now + progress_tick_chrono;
        }

        time_source::sleep(SESSION_TICK);
    }

    observer.session_ended(time_source::now());
    Ok(SessionOutcome::Completed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_durations() {
        assert!(DurationRange::new(0, 10).is_err());
        assert!(DurationRange::new(10, 0).is_err());
        assert!(DurationRange::new(0, 0).is_err());
    }

    #[test]
    fn rejects_max_below_min() {
        let result = DurationRange::new(120, 60);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must be >= min"));
    }

    #[test]
    fn draws_stay_within_bounds() {
        let range = DurationRange::new(30, 45).unwrap();
        for _ in 0..500 {
            let minutes = range.draw_minutes();
            assert!((30..=45).contains(&minutes));
        }
    }

    #[test]
    fn degenerate_range_always_draws_min() {
        let range = DurationRange::new(240, 240).unwrap();
        for _ in 0..50 {
            assert_eq!(range.draw_minutes(), 240);
        }
    }
}
