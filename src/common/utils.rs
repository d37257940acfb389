//! Shared utilities: terminal management and small formatting helpers.

use anyhow::{Context, Result};
use std::io::{IsTerminal, Write, stdout};
use std::os::fd::AsRawFd;
use termios::{ECHO, ICANON, TCSADRAIN, Termios, VMIN, VTIME, tcsetattr};

/// RAII guard for terminal features used during interactive operation.
///
/// Puts the terminal into cbreak mode (single-key reads without Enter, echo
/// suppressed, output processing untouched so log lines render normally),
/// hides the cursor, and disables auto-wrap so progress redraws never spill
/// onto a new row. Everything is restored on drop. When stdin or stdout is
/// not a terminal (service manager, pipes) the guard does nothing and the
/// application degrades to non-interactive operation.
pub struct TerminalGuard {
    saved: Option<Termios>,
}

impl TerminalGuard {
    pub fn new() -> Result<Self> {
        if !std::io::stdin().is_terminal() || !stdout().is_terminal() {
            return Ok(Self { saved: None });
        }

        let fd = std::io::stdin().as_raw_fd();
        let saved = Termios::from_fd(fd).context("failed to read terminal attributes")?;

        let mut cbreak = saved;
        cbreak.c_lflag &= !(ICANON | ECHO);
        cbreak.c_cc[VMIN] = 1;
        cbreak.c_cc[VTIME] = 0;
        tcsetattr(fd, TCSADRAIN, &cbreak).context("failed to set terminal attributes")?;

        // Hide cursor, disable auto-wrap (DECAWM)
        print!("\x1b[?25l\x1b[?7l");
        let _ = stdout().flush();

        Ok(Self { saved: Some(saved) })
    }

    /// Whether interactive terminal features are active.
    pub fn is_interactive(&self) -> bool {
        self.saved.is_some()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            print!("\x1b[?7h\x1b[?25h");
            let _ = stdout().flush();
            let fd = std::io::stdin().as_raw_fd();
            let _ = tcsetattr(fd, TCSADRAIN, &saved);
        }
    }
}

/// Format a second count as `HH:MM:SS` for countdown readouts.
pub fn format_hhmmss(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Check whether a process with the given PID is currently running.
///
/// Uses signal 0 (existence probe, no signal delivered).
pub fn is_process_running(pid: u32) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hhmmss_pads_components() {
        assert_eq!(format_hhmmss(0), "00:00:00");
        assert_eq!(format_hhmmss(59), "00:00:59");
        assert_eq!(format_hhmmss(60), "00:01:00");
        assert_eq!(format_hhmmss(3661), "01:01:01");
        assert_eq!(format_hhmmss(21830), "06:03:50");
    }

    #[test]
    fn current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }
}
