//! Configuration validation.
//!
//! Resolves the raw, optional configuration fields into validated schedule
//! parameters. Every check here runs once at startup; any failure is fatal
//! and aborts before a session runs.

use anyhow::{Context, Result, bail};
use std::time::Duration;

use super::Config;
use crate::core::{DurationRange, Params, TimeWindow, normalize_days, parse_time_of_day};

/// Resolve and validate a configuration into runtime parameters.
pub fn resolve(config: &Config) -> Result<Params> {
    let start = parse_time_of_day(config.window_start_str())
        .with_context(|| format!("invalid window_start ({:?})", config.window_start_str()))?;
    let end = parse_time_of_day(config.window_end_str())
        .with_context(|| format!("invalid window_end ({:?})", config.window_end_str()))?;
    let window = TimeWindow::new(start, end)?;

    let weekdays = normalize_days(config.days_of_week_str())?;

    let durations = DurationRange::new(
        config.min_duration_minutes(),
        config.max_duration_minutes(),
    )?;

    let interval_seconds = config.interval_seconds();
    if interval_seconds == 0 {
        bail!("interval_seconds must be > 0");
    }

    let progress_tick_seconds = config.progress_tick_seconds();
    if progress_tick_seconds == 0 {
        bail!("progress_tick_seconds must be > 0");
    }

    Ok(Params {
        window,
        weekdays,
        durations,
        interval: Duration::from_secs(interval_seconds),
        progress_tick: Duration::from_secs(progress_tick_seconds),
    })
}
