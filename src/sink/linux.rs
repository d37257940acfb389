//! Linux keepalive sink: systemd-inhibit for the idle inhibitor, wtype or
//! xdotool for key injection.
//!
//! The injection tool is chosen by display-server detection: `wtype` on a
//! Wayland session, `xdotool` on X11. Both the inhibitor and the injection
//! tool are optional; whatever is missing is reported once at startup and
//! the rest keeps working.

use anyhow::{Context, Result, bail};
use std::process::{Child, Command, Stdio};

use super::KeepaliveSink;

/// Key injection tool resolved at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulseTool {
    Wtype,
    Xdotool,
}

pub struct LinuxSink {
    debug_enabled: bool,
    inhibitor: Option<Child>,
    pulse_tool: Option<PulseTool>,
}

impl LinuxSink {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            inhibitor: None,
            pulse_tool: None,
        }
    }
}

/// Check whether an executable is reachable through PATH.
fn tool_available(name: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(name).is_file()))
        .unwrap_or(false)
}

/// Pick the key injection tool matching the running display server.
fn detect_pulse_tool() -> Option<PulseTool> {
    if std::env::var("WAYLAND_DISPLAY").is_ok() && tool_available("wtype") {
        return Some(PulseTool::Wtype);
    }
    if std::env::var("DISPLAY").is_ok() && tool_available("xdotool") {
        return Some(PulseTool::Xdotool);
    }
    None
}

impl KeepaliveSink for LinuxSink {
    fn open(&mut self) -> Result<()> {
        if tool_available("systemd-inhibit") {
            let child = Command::new("systemd-inhibit")
                .args([
                    "--what=idle:sleep",
                    "--who=wakeguard",
                    "--why=scheduled keepalive session",
                    "sleep",
                    "infinity",
                ])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .context("failed to start systemd-inhibit")?;
            if self.debug_enabled {
                log_pipe!();
                log_debug!("systemd-inhibit started (PID {})", child.id());
            }
            self.inhibitor = Some(child);
        } else {
            log_pipe!();
            log_warning!("systemd-inhibit not found; running without an idle inhibitor");
        }

        self.pulse_tool = detect_pulse_tool();
        if self.pulse_tool.is_none() {
            log_pipe!();
            log_warning!("No key injection tool found (install wtype or xdotool)");
            log_indented!("Keepalive pulses will be skipped");
        } else if self.debug_enabled {
            log_pipe!();
            log_debug!(
                "Key injection via {}",
                match self.pulse_tool {
                    Some(PulseTool::Wtype) => "wtype",
                    _ => "xdotool",
                }
            );
        }

        Ok(())
    }

    fn pulse(&mut self) -> Result<()> {
        let status = match self.pulse_tool {
            Some(PulseTool::Wtype) => Command::new("wtype")
                .args(["-k", "F13"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .context("failed to run wtype")?,
            Some(PulseTool::Xdotool) => Command::new("xdotool")
                .args(["key", "--clearmodifiers", "F13"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .context("failed to run xdotool")?,
            // Reported once at open; the inhibitor still does its job.
            None => return Ok(()),
        };

        if !status.success() {
            bail!("key injection exited with {status}");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Linux"
    }

    fn close(mut self: Box<Self>, debug_enabled: bool) {
        if let Some(mut child) = self.inhibitor.take() {
            let _ = child.kill();
            let _ = child.wait();
            if debug_enabled {
                log_debug!("systemd-inhibit stopped");
            }
        }
    }
}
