//! macOS keepalive sink: caffeinate for the idle inhibitor, System Events
//! key injection for pulses.
//!
//! Pulses send F13 (key code 105), which no stock macOS binding reacts to.
//! Key injection requires the terminal app to be allowed under Privacy &
//! Security → Accessibility and Automation ("System Events").

use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::{Child, Command, Stdio};

use super::KeepaliveSink;

const CAFFEINATE_PATH: &str = "/usr/bin/caffeinate";
const OSASCRIPT_PATH: &str = "/usr/bin/osascript";

/// System Events key code for F13.
const F13_KEY_CODE: u32 = 105;

pub struct MacosSink {
    debug_enabled: bool,
    caffeinate: Option<Child>,
}

impl MacosSink {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            caffeinate: None,
        }
    }
}

impl KeepaliveSink for MacosSink {
    fn open(&mut self) -> Result<()> {
        if !Path::new(CAFFEINATE_PATH).exists() {
            bail!("{CAFFEINATE_PATH} not found; this sink requires macOS");
        }

        // -d display sleep, -i idle system sleep, -s sleep on AC, -m disk idle sleep
        let child = Command::new(CAFFEINATE_PATH)
            .args(["-d", "-i", "-s", "-m"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start caffeinate")?;

        if self.debug_enabled {
            log_pipe!();
            log_debug!("caffeinate started (PID {})", child.id());
        }
        self.caffeinate = Some(child);
        Ok(())
    }

    fn pulse(&mut self) -> Result<()> {
        let script = format!("tell application \"System Events\" to key code {F13_KEY_CODE}");
        let status = Command::new(OSASCRIPT_PATH)
            .args(["-e", &script])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("failed to run osascript")?;

        if !status.success() {
            bail!(
                "osascript exited with {status}; allow your terminal under \
                 Accessibility and Automation (System Events)"
            );
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "macOS"
    }

    fn close(mut self: Box<Self>, debug_enabled: bool) {
        if let Some(mut child) = self.caffeinate.take() {
            let _ = child.kill();
            let _ = child.wait();
            if debug_enabled {
                log_debug!("caffeinate stopped");
            }
        }
    }
}
