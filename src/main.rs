//! Binary entry point: argument parsing and dispatch.
//!
//! All application logic lives in the library; this file only turns the
//! parsed [`CliAction`] into the matching call.

use anyhow::Result;

use wakeguard::Wakeguard;
use wakeguard::args::{self, CliAction, ParsedArgs};
use wakeguard::common::constants::EXIT_FAILURE;

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            overrides,
        } => Wakeguard::new(debug_enabled)
            .with_config_dir(config_dir)
            .with_overrides(overrides)
            .run(),
    }
}
