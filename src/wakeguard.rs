//! Top-level application runner and high-level flow coordination.
//!
//! Orchestrates the application lifecycle after argument parsing:
//!
//! 1. Terminal setup (cbreak mode, hidden cursor) via `TerminalGuard`
//! 2. Configuration loading, CLI override merge, validation
//! 3. Single-instance lock acquisition
//! 4. Signal handler installation
//! 5. Keepalive sink detection and inhibitor acquisition
//! 6. The core session loop (immediate session, then scheduled forever)
//! 7. Cleanup on quit: sink release, lock removal, final log marker
//!
//! Fatal setup errors (invalid configuration, duplicate instance, sink open
//! failure) are reported through `log_error_exit!` and end the process with
//! a non-zero code before the loop starts. A quit — interactive key or
//! termination signal — exits 0.

use anyhow::{Context, Result};

use crate::args::CliOverrides;
use crate::common::constants::EXIT_FAILURE;
use crate::common::utils::TerminalGuard;
use crate::config::{self, Config};
use crate::core::Core;
use crate::display::ConsoleObserver;
use crate::io::{input, instance, signals::setup_signal_handler};
use crate::sink::{create_sink, detect_sink};

/// Builder for configuring and running the wakeguard application.
///
/// # Examples
///
/// ```no_run
/// use wakeguard::Wakeguard;
///
/// # fn main() -> anyhow::Result<()> {
/// let debug_enabled = false;
/// Wakeguard::new(debug_enabled).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Wakeguard {
    debug_enabled: bool,
    config_dir: Option<String>,
    overrides: CliOverrides,
}

impl Wakeguard {
    /// Create a new runner with defaults matching a normal run.
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            config_dir: None,
            overrides: CliOverrides::default(),
        }
    }

    /// Use a custom configuration directory.
    pub fn with_config_dir(mut self, config_dir: Option<String>) -> Self {
        self.config_dir = config_dir;
        self
    }

    /// Apply command-line schedule overrides on top of the config file.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Execute the application.
    pub fn run(self) -> Result<()> {
        log_version!();

        if self.debug_enabled {
            log_pipe!();
            log_debug!("Debug mode enabled - showing detailed sink operations");
        }

        // Terminal features degrade gracefully when no TTY is attached
        let _term = TerminalGuard::new().context("failed to initialize terminal features")?;

        // Load and validate configuration first; any failure is fatal
        // before a session runs
        let params = match self.load_params() {
            Ok(params) => params,
            Err(e) => {
                log_error_exit!("Configuration failed");
                eprintln!("{e:?}");
                std::process::exit(EXIT_FAILURE);
            }
        };

        // A second instance would double every pulse; refuse to start
        let _lock = match instance::acquire() {
            Ok(lock) => lock,
            Err(e) => {
                log_error_exit!("{e}");
                std::process::exit(EXIT_FAILURE);
            }
        };

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        params.log_config();

        let sink_type = detect_sink();
        let mut sink = create_sink(sink_type, self.debug_enabled)?;
        if let Err(e) = sink.open() {
            log_error_exit!("Failed to acquire the idle inhibitor: {e}");
            std::process::exit(EXIT_FAILURE);
        }
        log_block_start!("Idle inhibitor active ({} sink)", sink.name());

        let poller = input::create_poller();
        let observer = Box::new(ConsoleObserver::new());

        let mut core = Core::new(params, sink, poller, observer);
        let result = core.run(&signal_state.running);

        // Release the inhibitor on every exit path, error included
        core.shutdown(self.debug_enabled);
        log_block_start!("Shutting down wakeguard...");
        log_end!();

        result
    }

    fn load_params(&self) -> Result<crate::core::Params> {
        let mut config = Config::load(self.config_dir.as_deref())?;
        self.overrides.apply(&mut config);
        config::validation::resolve(&config)
    }
}
