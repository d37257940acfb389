//! Core scheduling loop and its building blocks.
//!
//! The [`Core`] owns the validated schedule parameters and the three
//! collaborators (keepalive sink, input poller, observer) and drives the
//! session cycle: one immediate session on launch, then forever compute the
//! next start, count down to it, and run the session. Exactly one session or
//! one wait period is active at any time.

pub mod schedule;
pub mod session;
pub mod wait;

pub use schedule::{TimeWindow, next_session_start, normalize_days, parse_time_of_day};
pub use session::{DurationRange, Session, SessionOutcome, run_session};
pub use wait::{WaitOutcome, wait_until};

use anyhow::Result;
use chrono::Weekday;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use crate::display::SessionObserver;
use crate::io::input::InputPoller;
use crate::sink::KeepaliveSink;
use crate::time_source;

/// Validated runtime parameters, resolved from the configuration at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub window: TimeWindow,
    pub weekdays: Vec<Weekday>,
    pub durations: DurationRange,
    pub interval: Duration,
    pub progress_tick: Duration,
}

impl Params {
    /// Log the resolved schedule in the structured block format.
    pub fn log_config(&self) {
        let days: Vec<&str> = self
            .weekdays
            .iter()
            .map(|d| schedule::weekday_abbrev(*d))
            .collect();
        log_block_start!("Schedule");
        log_indented!(
            "Start window: {} – {}",
            self.window.start().format("%H:%M:%S"),
            self.window.end().format("%H:%M:%S")
        );
        log_indented!("Days of week: {}", days.join(", "));
        log_indented!(
            "Session length: {}–{} minutes",
            self.durations.min_minutes(),
            self.durations.max_minutes()
        );
        log_indented!("Pulse interval: {} seconds", self.interval.as_secs());
    }
}

/// Owns the schedule and collaborators; runs sessions until quit.
pub struct Core {
    params: Params,
    sink: Box<dyn KeepaliveSink>,
    poller: Box<dyn InputPoller>,
    observer: Box<dyn SessionObserver>,
}

impl Core {
    pub fn new(
        params: Params,
        sink: Box<dyn KeepaliveSink>,
        poller: Box<dyn InputPoller>,
        observer: Box<dyn SessionObserver>,
    ) -> Self {
        Self {
            params,
            sink,
            poller,
            observer,
        }
    }

    /// Run one immediate session, then schedule/wait/run until quit.
    ///
    /// Returns only when a quit was requested (key or signal); the schedule
    /// itself never runs out.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        // Immediate session on launch
        if self.run_one(running)? == SessionOutcome::QuitRequested {
            return Ok(());
        }

        loop {
            let next = next_session_start(
                time_source::now(),
                &self.params.window,
                &self.params.weekdays,
            )?;
            match wait_until(
                next,
                self.params.progress_tick,
                self.poller.as_mut(),
                self.observer.as_mut(),
                running,
            )? {
                WaitOutcome::QuitRequested => return Ok(()),
                WaitOutcome::Reached => {}
            }
            if self.run_one(running)? == SessionOutcome::QuitRequested {
                return Ok(());
            }
        }
    }

    fn run_one(&mut self, running: &AtomicBool) -> Result<SessionOutcome> {
        run_session(
            &self.params.durations,
            self.params.interval,
            self.params.progress_tick,
            self.sink.as_mut(),
            self.poller.as_mut(),
            self.observer.as_mut(),
            running,
        )
    }

    /// Release the sink's held resources (idle inhibitor, child processes).
    pub fn shutdown(self, debug_enabled: bool) {
        self.sink.close(debug_enabled);
    }
}
