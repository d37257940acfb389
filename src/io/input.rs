//! Non-blocking single-character command input.
//!
//! The polling loops check for pending commands every tick without ever
//! blocking on the terminal. In non-interactive contexts (pipes, service
//! managers) the null poller simply never reports a command, so the
//! scheduler degrades gracefully instead of failing.

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use std::io::IsTerminal;
use std::time::Duration;

use crate::common::constants::CMD_QUIT;

/// Non-blocking check for a pending single-character command.
pub trait InputPoller {
    /// Return the first pending accepted command character (uppercased), or
    /// `None` when nothing relevant is pending. Returns immediately either
    /// way.
    fn poll_command(&mut self, accepted: &[char]) -> Option<char>;
}

/// Reads pending key events from the terminal with a zero timeout.
pub struct TerminalPoller;

impl InputPoller for TerminalPoller {
    fn poll_command(&mut self, accepted: &[char]) -> Option<char> {
        // Drain everything pending so stale keypresses don't pile up
        // between ticks.
        while event::poll(Duration::ZERO).unwrap_or(false) {
            let Ok(ev) = event::read() else {
                return None;
            };
            if let Event::Key(key) = ev {
                // Ctrl+C counts as quit when the byte reaches us directly
                // (raw-mode terminals deliver it as a key, not a signal).
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    if accepted.contains(&CMD_QUIT) {
                        return Some(CMD_QUIT);
                    }
                    continue;
                }
                if let KeyCode::Char(c) = key.code {
                    let upper = c.to_ascii_uppercase();
                    if accepted.contains(&upper) {
                        return Some(upper);
                    }
                }
            }
        }
        None
    }
}

/// Poller for non-interactive contexts: never reports a command.
pub struct NullPoller;

impl InputPoller for NullPoller {
    fn poll_command(&mut self, _accepted: &[char]) -> Option<char> {
        None
    }
}

/// Create the right poller for the current context.
pub fn create_poller() -> Box<dyn InputPoller> {
    if std::io::stdin().is_terminal() {
        Box::new(TerminalPoller)
    } else {
        Box::new(NullPoller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_poller_never_reports() {
        let mut poller = NullPoller;
        assert_eq!(poller.poll_command(&['Q', 'E']), None);
        assert_eq!(poller.poll_command(&[]), None);
    }
}
