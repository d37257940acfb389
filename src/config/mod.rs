//! Configuration system for wakeguard.
//!
//! Handles the TOML-based configuration file, default value generation, and
//! the merge with command-line overrides. The file is searched at
//! `XDG_CONFIG_HOME/wakeguard/wakeguard.toml` (or a custom directory given
//! with `--config`); a commented default file is created on first run.
//!
//! ```toml
//! #[Start window]
//! window_start = "08:30"        # Earliest daily session start (HH:MM or HH:MM:SS)
//! window_end = "10:00"          # Latest daily session start
//! days_of_week = "Mon,Tue,Wed,Thu,Fri"
//!
//! #[Sessions]
//! min_duration_minutes = 240    # Shortest session length
//! max_duration_minutes = 480    # Longest session length
//! interval_seconds = 60         # Seconds between keepalive pulses
//! progress_tick_seconds = 1     # Seconds between progress updates
//! ```
//!
//! All fields are optional; defaults apply when missing. Validation happens
//! after the CLI merge, in [`validation::resolve`], and any failure aborts
//! before a session runs.

pub mod validation;


use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::constants::*;

/// Contents written when no configuration file exists yet.
const DEFAULT_CONFIG_CONTENT: &str = r#"#[Start window]
window_start = "08:30"        # Earliest daily session start (HH:MM or HH:MM:SS)
window_end = "10:00"          # Latest daily session start
days_of_week = "Mon,Tue,Wed,Thu,Fri"

#[Sessions]
min_duration_minutes = 240    # Shortest session length
max_duration_minutes = 480    # Longest session length
interval_seconds = 60         # Seconds between keepalive pulses
progress_tick_seconds = 1     # Seconds between progress updates
"#;

/// Configuration structure for wakeguard application settings.
///
/// All fields are optional in the file; [`validation::resolve`] applies
/// defaults and turns the raw strings into validated schedule parameters.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Earliest daily clock time a scheduled session may start.
    pub window_start: Option<String>,
    /// Latest daily clock time a scheduled session may start.
    pub window_end: Option<String>,
    /// Comma-separated weekday allow-list (3-letter names, case-insensitive).
    pub days_of_week: Option<String>,
    /// Minimum session length in minutes.
    pub min_duration_minutes: Option<u64>,
    /// Maximum session length in minutes.
    pub max_duration_minutes: Option<u64>,
    /// Seconds between keepalive pulses during a session.
    pub interval_seconds: Option<u64>,
    /// Seconds between progress/countdown updates.
    pub progress_tick_seconds: Option<u64>,
}

impl Config {
    /// Load the configuration file, creating a commented default on first run.
    pub fn load(config_dir: Option<&str>) -> Result<Self> {
        let path = get_config_path(config_dir)?;

        if !path.exists() {
            create_default_config(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        Ok(config)
    }

    // Effective values with defaults applied; validation works on these.

    pub fn window_start_str(&self) -> &str {
        self.window_start.as_deref().unwrap_or(DEFAULT_WINDOW_START)
    }

    pub fn window_end_str(&self) -> &str {
        self.window_end.as_deref().unwrap_or(DEFAULT_WINDOW_END)
    }

    pub fn days_of_week_str(&self) -> &str {
        self.days_of_week.as_deref().unwrap_or(DEFAULT_DAYS_OF_WEEK)
    }

    pub fn min_duration_minutes(&self) -> u64 {
        self.min_duration_minutes
            .unwrap_or(DEFAULT_MIN_DURATION_MINUTES)
    }

    pub fn max_duration_minutes(&self) -> u64 {
        self.max_duration_minutes
            .unwrap_or(DEFAULT_MAX_DURATION_MINUTES)
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS)
    }

    pub fn progress_tick_seconds(&self) -> u64 {
        self.progress_tick_seconds
            .unwrap_or(DEFAULT_PROGRESS_TICK_SECONDS)
    }
}

/// Determine the configuration file path.
///
/// A custom directory given with `--config` takes precedence; otherwise the
/// XDG config directory is used.
pub fn get_config_path(config_dir: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = config_dir {
        return Ok(PathBuf::from(dir).join("wakeguard.toml"));
    }

    let base = dirs::config_dir().context("could not determine the user configuration directory")?;
    Ok(base.join("wakeguard").join("wakeguard.toml"))
}

/// Write the commented default configuration file.
fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_CONTENT)?;
    log_block_start!("Created default configuration: {}", path.display());
    Ok(())
}
