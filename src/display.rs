//! Structured session events and their console rendering.
//!
//! The core loops report what happens through the [`SessionObserver`] trait;
//! how an event looks (log line, progress bar, nothing at all) is entirely
//! the observer's concern. [`ConsoleObserver`] renders lifecycle events
//! through the structured logger and progress as a single self-overwriting
//! terminal line:
//!
//! ```text
//! RUN  06:03:50  [####--------]  40%
//! WAIT 10:19:05
//! ```

use chrono::{DateTime, Local};
use std::io::{IsTerminal, Write, stdout};
use std::time::Duration;

use crate::common::utils::format_hhmmss;
use crate::core::session::Session;

/// Receives structured scheduler events.
pub trait SessionObserver {
    fn session_started(&mut self, session: &Session);
    fn session_progress(&mut self, percent: u8, remaining: Duration);
    fn session_ended(&mut self, at: DateTime<Local>);
    fn waiting(&mut self, target: DateTime<Local>);
    fn wait_progress(&mut self, remaining: Duration);
    fn wait_completed(&mut self);
    fn quit_requested(&mut self);
}

const BAR_WIDTH: usize = 12;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Console renderer: lifecycle through the log macros, progress as one
/// continuously rewritten line (CR + clear, truncated to the terminal
/// width so redraws never spill onto a new row).
pub struct ConsoleObserver {
    tty: bool,
    line_active: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            tty: stdout().is_terminal(),
            line_active: false,
        }
    }

    fn draw_line(&mut self, line: &str) {
        if !self.tty {
            return;
        }
        let max_len = terminal_columns().saturating_sub(2).max(10);
        let truncated: String = line.chars().take(max_len).collect();
        print!("\r\x1b[2K{truncated}");
        let _ = stdout().flush();
        self.line_active = true;
    }

    fn clear_line(&mut self) {
        if self.tty && self.line_active {
            print!("\r\x1b[2K");
            let _ = stdout().flush();
            self.line_active = false;
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ConsoleObserver {
    fn session_started(&mut self, session: &Session) {
        log_block_start!(
            "Session started: {} | duration {} minutes | ends {}",
            session.start.format(TIMESTAMP_FORMAT),
            session.duration_minutes,
            session.end.format(TIMESTAMP_FORMAT)
        );
        log_indented!("[E] end session early · [Q] quit");
    }

    fn session_progress(&mut self, percent: u8, remaining: Duration) {
        let done = (percent as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(done), "-".repeat(BAR_WIDTH - done));
        self.draw_line(&format!(
            "RUN  {}  [{bar}] {percent:3}%",
            format_hhmmss(remaining.as_secs())
        ));
    }

    fn session_ended(&mut self, at: DateTime<Local>) {
        self.clear_line();
        log_decorated!("Session ended: {}", at.format(TIMESTAMP_FORMAT));
    }

    fn waiting(&mut self, target: DateTime<Local>) {
        log_block_start!("Next session starts at {}", target.format(TIMESTAMP_FORMAT));
        log_indented!("[Q] quit");
    }

    fn wait_progress(&mut self, remaining: Duration) {
        self.draw_line(&format!("WAIT {}", format_hhmmss(remaining.as_secs())));
    }

    fn wait_completed(&mut self) {
        self.clear_line();
    }

    fn quit_requested(&mut self) {
        self.clear_line();
        log_block_start!("Quit requested, shutting down...");
    }
}

fn terminal_columns() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80)
}
