//! `frame-sync` diagnostic CLI.
//!
//! Neither mode contacts a TV or writes state:
//! - `--test-solar` / `test-solar` prints predicted solar brightness for the
//!   equinox and solstices of the current year
//! - `check-config` validates the full configuration and prints it

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use core_runtime::config::{logging_from_env, FrameSyncConfig, ProcessEnv, SolarSettings};
use core_runtime::logging::init_logging;
use core_solar::{render_configuration_error, render_report};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "frame-sync",
    version,
    about = "Keep Frame TV Art Mode galleries in sync with a local folder"
)]
struct Cli {
    /// Print predicted solar brightness for reference days and exit
    #[arg(long)]
    test_solar: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print predicted solar brightness for reference days
    TestSolar,
    /// Validate the configuration and print the resolved settings
    CheckConfig,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let logging = logging_from_env(&ProcessEnv).context("Invalid logging configuration")?;
    init_logging(logging).context("Cannot initialize logging")?;

    match (cli.test_solar, cli.command) {
        (true, _) | (_, Some(Command::TestSolar)) => Ok(test_solar()),
        (false, Some(Command::CheckConfig)) => Ok(check_config()),
        (false, None) => {
            Cli::command().print_help()?;
            Ok(ExitCode::from(2))
        }
    }
}

fn test_solar() -> ExitCode {
    match SolarSettings::from_env(&ProcessEnv) {
        Ok(solar) => {
            print!(
                "{}",
                render_report(Utc::now().year(), &solar.location, solar.range)
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            print!("{}", render_configuration_error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn check_config() -> ExitCode {
    match FrameSyncConfig::from_env(&ProcessEnv) {
        Ok(config) => {
            println!("{}", config);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_and_subcommand_both_parse() {
        let cli = Cli::try_parse_from(["frame-sync", "--test-solar"]).unwrap();
        assert!(cli.test_solar);
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["frame-sync", "test-solar"]).unwrap();
        assert_eq!(cli.command, Some(Command::TestSolar));

        let cli = Cli::try_parse_from(["frame-sync", "check-config"]).unwrap();
        assert_eq!(cli.command, Some(Command::CheckConfig));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["frame-sync", "upload-now"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
