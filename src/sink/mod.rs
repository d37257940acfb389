//! Keepalive sink abstraction: the platform primitives that keep a machine
//! awake.
//!
//! A sink covers two independent jobs. `open` acquires an idle inhibitor
//! held for the whole process lifetime (caffeinate on macOS,
//! systemd-inhibit on Linux); `pulse` emits one harmless F13 keypress during
//! active sessions. The scheduler only sees the [`KeepaliveSink`] trait and
//! never knows which variant is running.
//!
//! Selection is automatic: `detect_sink` picks the variant for the target
//! platform and `create_sink` constructs it, falling back to an inert sink
//! on unsupported platforms so the scheduler still runs.

use anyhow::Result;

pub mod linux;
pub mod macos;
pub mod null;

/// Platform primitive for suppressing idle/sleep and emitting keepalive
/// pulses.
pub trait KeepaliveSink {
    /// Acquire the idle inhibitor, held until `close`.
    ///
    /// Failure here is fatal: without the inhibitor the tool does not do
    /// what it promises outside of sessions.
    fn open(&mut self) -> Result<()>;

    /// Emit one keepalive pulse.
    ///
    /// Failure is non-fatal to the session loop; the caller logs it and
    /// keeps the cadence. The inhibitor is unaffected.
    fn pulse(&mut self) -> Result<()>;

    /// Human-readable name for this sink.
    fn name(&self) -> &'static str;

    /// Release held resources (inhibitor child process, assertions).
    fn close(self: Box<Self>, debug_enabled: bool);
}

/// Enumeration of available sink variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkType {
    /// caffeinate + System Events key injection
    MacOs,
    /// systemd-inhibit + wtype/xdotool key injection
    Linux,
    /// Inert sink for unsupported platforms
    Null,
}

impl SinkType {
    /// Get the human-readable name for this sink type.
    pub fn name(&self) -> &'static str {
        match self {
            SinkType::MacOs => "macOS",
            SinkType::Linux => "Linux",
            SinkType::Null => "null",
        }
    }
}

/// Detect the appropriate sink for the current platform.
pub fn detect_sink() -> SinkType {
    if cfg!(target_os = "macos") {
        SinkType::MacOs
    } else if cfg!(target_os = "linux") {
        SinkType::Linux
    } else {
        SinkType::Null
    }
}

/// Create a sink instance of the detected or configured type.
pub fn create_sink(sink_type: SinkType, debug_enabled: bool) -> Result<Box<dyn KeepaliveSink>> {
    match sink_type {
        SinkType::MacOs => Ok(Box::new(macos::MacosSink::new(debug_enabled))),
        SinkType::Linux => Ok(Box::new(linux::LinuxSink::new(debug_enabled))),
        SinkType::Null => Ok(Box::new(null::NullSink)),
    }
}
