//! Inert sink for platforms without a supported keepalive primitive.
//!
//! The scheduler runs normally; pulses and the inhibitor are no-ops.

use anyhow::Result;

use super::KeepaliveSink;

pub struct NullSink;

impl KeepaliveSink for NullSink {
    fn open(&mut self) -> Result<()> {
        log_pipe!();
        log_warning!("No keepalive primitive available on this platform");
        log_indented!("Sessions will run without pulses or an idle inhibitor");
        Ok(())
    }

    fn pulse(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }

    fn close(self: Box<Self>, _debug_enabled: bool) {}
}
