//! Application-wide constants and defaults.

use std::time::Duration;

// Configuration defaults
pub const DEFAULT_WINDOW_START: &str = "08:30";
pub const DEFAULT_WINDOW_END: &str = "10:00";
pub const DEFAULT_DAYS_OF_WEEK: &str = "Mon,Tue,Wed,Thu,Fri";
pub const DEFAULT_MIN_DURATION_MINUTES: u64 = 240;
pub const DEFAULT_MAX_DURATION_MINUTES: u64 = 480;
pub const DEFAULT_INTERVAL_SECONDS: u64 = 60;
pub const DEFAULT_PROGRESS_TICK_SECONDS: u64 = 1;

// Polling cadence: fast ticks while a session runs so keypress commands are
// picked up promptly, coarse ticks while idle between sessions.
pub const SESSION_TICK: Duration = Duration::from_millis(250);
pub const WAIT_TICK: Duration = Duration::from_secs(1);

/// How many calendar days ahead the scheduler scans for an eligible slot.
/// Any non-empty weekday set recurs within 7 days; 14 leaves slack.
pub const SCHEDULE_HORIZON_DAYS: u64 = 14;

// Interactive single-key commands
pub const CMD_QUIT: char = 'Q';
pub const CMD_END_EARLY: char = 'E';

// Process exit code for fatal startup errors; a quit exits 0
pub const EXIT_FAILURE: i32 = 1;

/// Shared values for unit and integration tests.
#[cfg(any(test, feature = "testing-support"))]
pub mod test_constants {
    pub const TEST_WINDOW_START: &str = "08:30";
    pub const TEST_WINDOW_END: &str = "10:00";
    pub const TEST_DAYS: &str = "Mon,Tue,Wed,Thu,Fri";
    pub const TEST_MIN_DURATION: u64 = 240;
    pub const TEST_MAX_DURATION: u64 = 480;
    pub const TEST_INTERVAL: u64 = 60;
    pub const TEST_PROGRESS_TICK: u64 = 1;
}
