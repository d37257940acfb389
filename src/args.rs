//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags plus per-field schedule overrides, while
//! gracefully handling unknown options.

use crate::config::Config;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the scheduler with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        overrides: CliOverrides,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit with failure
    ShowHelpDueToError,
}

/// Schedule settings given on the command line.
///
/// Each populated field overrides the corresponding `wakeguard.toml` value.
#[derive(Debug, Default, PartialEq)]
pub struct CliOverrides {
    pub window_start: Option<String>,
    pub window_end: Option<String>,
    pub days_of_week: Option<String>,
    pub min_duration_minutes: Option<u64>,
    pub max_duration_minutes: Option<u64>,
    pub interval_seconds: Option<u64>,
    pub progress_tick_seconds: Option<u64>,
}

impl CliOverrides {
    /// Merge these overrides into a loaded configuration; CLI values win.
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = &self.window_start {
            config.window_start = Some(v.clone());
        }
        if let Some(v) = &self.window_end {
            config.window_end = Some(v.clone());
        }
        if let Some(v) = &self.days_of_week {
            config.days_of_week = Some(v.clone());
        }
        if let Some(v) = self.min_duration_minutes {
            config.min_duration_minutes = Some(v);
        }
        if let Some(v) = self.max_duration_minutes {
            config.max_duration_minutes = Some(v);
        }
        if let Some(v) = self.interval_seconds {
            config.interval_seconds = Some(v);
        }
        if let Some(v) = self.progress_tick_seconds {
            config.progress_tick_seconds = Some(v);
        }
    }
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse the process's own arguments.
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }

    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut overrides = CliOverrides::default();

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => {
                    // Parse: --config <directory>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--start-window-start" => {
                    match take_string_value(&args_vec, i, arg_str, "<HH:MM>") {
                        Some(value) => {
                            overrides.window_start = Some(value);
                            i += 1;
                        }
                        None => unknown_arg_found = true,
                    }
                }
                "--start-window-end" => match take_string_value(&args_vec, i, arg_str, "<HH:MM>") {
                    Some(value) => {
                        overrides.window_end = Some(value);
                        i += 1;
                    }
                    None => unknown_arg_found = true,
                },
                "--days-of-week" => {
                    match take_string_value(&args_vec, i, arg_str, "<Mon,Tue,...>") {
                        Some(value) => {
                            overrides.days_of_week = Some(value);
                            i += 1;
                        }
                        None => unknown_arg_found = true,
                    }
                }
                "--min-duration-minutes" => match take_numeric_value(&args_vec, i, arg_str) {
                    Some(value) => {
                        overrides.min_duration_minutes = Some(value);
                        i += 1;
                    }
                    None => unknown_arg_found = true,
                },
                "--max-duration-minutes" => match take_numeric_value(&args_vec, i, arg_str) {
                    Some(value) => {
                        overrides.max_duration_minutes = Some(value);
                        i += 1;
                    }
                    None => unknown_arg_found = true,
                },
                "--interval-seconds" => match take_numeric_value(&args_vec, i, arg_str) {
                    Some(value) => {
                        overrides.interval_seconds = Some(value);
                        i += 1;
                    }
                    None => unknown_arg_found = true,
                },
                "--progress-tick-seconds" => match take_numeric_value(&args_vec, i, arg_str) {
                    Some(value) => {
                        overrides.progress_tick_seconds = Some(value);
                        i += 1;
                    }
                    None => unknown_arg_found = true,
                },
                _ => {
                    log_warning!("Unknown argument: {}", arg_str);
                    unknown_arg_found = true;
                }
            }
            i += 1;
        }

        // Version and help take precedence over running
        let action = if display_version {
            CliAction::ShowVersion
        } else if display_help {
            CliAction::ShowHelp
        } else if unknown_arg_found {
            CliAction::ShowHelpDueToError
        } else {
            CliAction::Run {
                debug_enabled,
                config_dir,
                overrides,
            }
        };

        ParsedArgs { action }
    }
}

/// Fetch the value following a string-valued flag, logging a usage hint when
/// it is missing.
fn take_string_value(args: &[String], i: usize, flag: &str, usage: &str) -> Option<String> {
    if i + 1 < args.len() && !args[i + 1].starts_with('-') {
        Some(args[i + 1].clone())
    } else {
        log_warning!("Missing value for {}. Usage: {} {}", flag, flag, usage);
        None
    }
}

/// Fetch and parse the value following a numeric flag.
fn take_numeric_value(args: &[String], i: usize, flag: &str) -> Option<u64> {
    if i + 1 >= args.len() {
        log_warning!("Missing value for {}. Usage: {} <n>", flag, flag);
        return None;
    }
    match args[i + 1].parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            log_warning!("Invalid value for {}: {}", flag, args[i + 1]);
            None
        }
    }
}

/// Displays version information.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("wakeguard [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>            Use custom configuration directory");
    log_indented!("-d, --debug                   Enable detailed debug output");
    log_indented!("-h, --help                    Print help information");
    log_indented!("-V, --version                 Print version information");
    log_block_start!("Schedule overrides (take precedence over wakeguard.toml):");
    log_indented!("--start-window-start <HH:MM>  Earliest daily session start (default 08:30)");
    log_indented!("--start-window-end <HH:MM>    Latest daily session start (default 10:00)");
    log_indented!("--days-of-week <list>         Eligible weekdays (default Mon,Tue,Wed,Thu,Fri)");
    log_indented!("--min-duration-minutes <n>    Minimum session length (default 240)");
    log_indented!("--max-duration-minutes <n>    Maximum session length (default 480)");
    log_indented!("--interval-seconds <n>        Seconds between keepalive pulses (default 60)");
    log_indented!("--progress-tick-seconds <n>   Seconds between progress updates (default 1)");
    log_block_start!("Controls while running:");
    log_indented!("E                             End the current session early");
    log_indented!("Q                             Quit");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let args = vec!["wakeguard"];
        let parsed = ParsedArgs::parse(args);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
                overrides: CliOverrides::default(),
            }
        );
    }

    #[test]
    fn test_parse_debug_flag() {
        for flag in ["--debug", "-d"] {
            let parsed = ParsedArgs::parse(vec!["wakeguard", flag]);
            assert_eq!(
                parsed.action,
                CliAction::Run {
                    debug_enabled: true,
                    config_dir: None,
                    overrides: CliOverrides::default(),
                }
            );
        }
    }

    #[test]
    fn test_parse_help_flag() {
        for flag in ["--help", "-h"] {
            let parsed = ParsedArgs::parse(vec!["wakeguard", flag]);
            assert_eq!(parsed.action, CliAction::ShowHelp);
        }
    }

    #[test]
    fn test_parse_version_flags() {
        for flag in ["--version", "-V", "-v"] {
            let parsed = ParsedArgs::parse(vec!["wakeguard", flag]);
            assert_eq!(parsed.action, CliAction::ShowVersion);
        }
    }

    #[test]
    fn test_help_takes_precedence_over_run() {
        let parsed = ParsedArgs::parse(vec!["wakeguard", "--debug", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_unknown_flag() {
        crate::common::logger::Log::set_enabled(false);
        let parsed = ParsedArgs::parse(vec!["wakeguard", "--unknown"]);
        crate::common::logger::Log::set_enabled(true);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_schedule_overrides() {
        let parsed = ParsedArgs::parse(vec![
            "wakeguard",
            "--start-window-start",
            "07:15",
            "--start-window-end",
            "09:45",
            "--days-of-week",
            "Sat,Sun",
            "--min-duration-minutes",
            "30",
            "--max-duration-minutes",
            "90",
            "--interval-seconds",
            "45",
            "--progress-tick-seconds",
            "2",
        ]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
                overrides: CliOverrides {
                    window_start: Some("07:15".to_string()),
                    window_end: Some("09:45".to_string()),
                    days_of_week: Some("Sat,Sun".to_string()),
                    min_duration_minutes: Some(30),
                    max_duration_minutes: Some(90),
                    interval_seconds: Some(45),
                    progress_tick_seconds: Some(2),
                },
            }
        );
    }

    #[test]
    fn test_parse_invalid_numeric_value() {
        crate::common::logger::Log::set_enabled(false);
        let parsed = ParsedArgs::parse(vec!["wakeguard", "--interval-seconds", "soon"]);
        crate::common::logger::Log::set_enabled(true);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_missing_config_dir() {
        crate::common::logger::Log::set_enabled(false);
        let parsed = ParsedArgs::parse(vec!["wakeguard", "--config"]);
        crate::common::logger::Log::set_enabled(true);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_overrides_apply_wins_over_file_values() {
        let mut config = Config {
            window_start: Some("08:30".to_string()),
            interval_seconds: Some(60),
            ..Config::default()
        };
        let overrides = CliOverrides {
            window_start: Some("06:00".to_string()),
            interval_seconds: Some(15),
            ..CliOverrides::default()
        };
        overrides.apply(&mut config);
        assert_eq!(config.window_start.as_deref(), Some("06:00"));
        assert_eq!(config.interval_seconds, Some(15));
        // Untouched fields keep their file values
        assert_eq!(config.window_end, None);
    }
}
