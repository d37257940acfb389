//! Signal handling for wakeguard.
//!
//! Termination signals clear a shared `running` flag that every poll tick
//! observes, so SIGINT/SIGTERM behave exactly like the interactive quit
//! command: the current session or wait period ends within one tick and the
//! sink releases its resources on the way out.

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

/// Signal handling state shared with the polling loops.
pub struct SignalState {
    /// Cleared when a termination signal arrives.
    pub running: Arc<AtomicBool>,
}

/// Install the signal handler thread.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));

    let mut signals =
        Signals::new([SIGINT, SIGTERM, SIGHUP]).context("failed to install signal handler")?;
    let running_for_handler = Arc::clone(&running);

    thread::spawn(move || {
        for signal in signals.forever() {
            if debug_enabled {
                log_pipe!();
                log_debug!("Received signal {signal}, shutting down");
            }
            running_for_handler.store(false, Ordering::SeqCst);
        }
    });

    Ok(SignalState { running })
}
