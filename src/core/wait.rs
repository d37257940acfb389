//! The idle period between sessions: countdown reporting and responsive quit.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::common::constants::{CMD_QUIT, WAIT_TICK};
use crate::display::SessionObserver;
use crate::io::input::InputPoller;
use crate::time_source;

/// How a wait period finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The target instant arrived.
    Reached,
    /// The quit command or a termination signal arrived.
    QuitRequested,
}

/// Wait until `target`, polling on a coarse tick.
///
/// Each tick checks for the quit command and the shared `running` flag;
/// countdown readouts go to the observer on the progress cadence.
pub fn wait_until(
    target: DateTime<Local>,
    progress_tick: Duration,
    poller: &mut dyn InputPoller,
    observer: &mut dyn SessionObserver,
    running: &AtomicBool,
) -> Result<WaitOutcome> {
    let progress_tick_chrono =
        ChronoDuration::from_std(progress_tick).context("progress tick out of range")?;

    observer.waiting(target);
    let mut next_progress_due = time_source::now();

    loop {
        let now = time_source::now();
        if now >= target {
            break;
        }

        if !running.load(Ordering::SeqCst) {
            observer.quit_requested();
            return Ok(WaitOutcome::QuitRequested);
        }

        if poller.poll_command(&[CMD_QUIT]) == Some(CMD_QUIT) {
            observer.quit_requested();
            return Ok(WaitOutcome::QuitRequested);
        }

        if now >= next_progress_due {
            let remaining = (target - now).num_seconds().max(0);
            observer.wait_progress(Duration::from_secs(remaining as u64));
            next_progress_due = now + progress_tick_chrono;
        }

        time_source::sleep(WAIT_TICK);
    }

    observer.wait_completed();
    Ok(WaitOutcome::Reached)
}
