//! Command-line interface parsing for the lunch CLI
//!
//! This module handles parsing of CLI arguments using clap, and resolving the
//! `print` flags into a concrete month and menu option selection.

use std::path::PathBuf;

use chrono::Month;
use clap::{Args, CommandFactory, Parser, Subcommand};
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The month name is not recognized
    #[error("Invalid month: '{0}'. Use a month name like 'september' or 'sep'")]
    InvalidMonth(String),

    /// No configured option matches the given name
    #[error("Unknown menu option: '{name}'. Available options: {available}")]
    UnknownOption { name: String, available: String },
}

/// Lunch CLI - print the NYC public school lunch menu
#[derive(Parser, Debug)]
#[command(name = "lunch")]
#[command(about = "Interact with the NYC public school menu")]
#[command(version)]
pub struct Cli {
    /// Path to the YAML config (defaults to ./config.yaml, then the user config directory)
    #[arg(long, global = true, env = "LUNCH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for cached menu files (defaults to the user cache directory)
    #[arg(long, global = true, env = "LUNCH_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a month of NYC public school meals
    Print(PrintArgs),
}

/// Flags for the `print` command
#[derive(Args, Debug, Default)]
pub struct PrintArgs {
    /// Month to print, e.g. "september" or "sep" (defaults to the current month)
    #[arg(long, value_name = "MONTH", conflicts_with = "next")]
    pub month: Option<String>,

    /// Print next month instead of the current one
    #[arg(long)]
    pub next: bool,

    /// Menu option to print, by name or path (defaults to the first configured option)
    #[arg(long, value_name = "NAME", conflicts_with_all = ["random", "interactive"])]
    pub option: Option<String>,

    /// Pick a menu option at random
    #[arg(long, conflicts_with = "interactive")]
    pub random: bool,

    /// Choose the menu option from an interactive list
    #[arg(short, long)]
    pub interactive: bool,

    /// Download the menu again even if it is cached
    #[arg(long)]
    pub refresh: bool,
}

/// Which month to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthChoice {
    /// The month the command runs in
    #[default]
    Current,
    /// The month after the current one
    Next,
    /// An explicitly named month
    Named(Month),
}

impl MonthChoice {
    /// Resolves the choice against the current month
    pub fn resolve(self, current: Month) -> Month {
        match self {
            MonthChoice::Current => current,
            MonthChoice::Next => current.succ(),
            MonthChoice::Named(month) => month,
        }
    }
}

/// How the menu option is picked
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionChoice {
    /// The first configured option
    #[default]
    First,
    /// The option whose name or path matches
    Named(String),
    /// A uniformly random option
    Random,
    /// Prompt the user to pick one
    Interactive,
}

/// Selection derived from the `print` flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintSelection {
    pub month: MonthChoice,
    pub option: OptionChoice,
    pub refresh: bool,
}

/// Parses a month argument, accepting full names and three-letter abbreviations
///
/// # Returns
/// * `Ok(Month)` if the string names a month, in any case
/// * `Err(CliError::InvalidMonth)` otherwise
pub fn parse_month_arg(s: &str) -> Result<Month, CliError> {
    s.trim()
        .parse::<Month>()
        .map_err(|_| CliError::InvalidMonth(s.to_string()))
}

impl PrintSelection {
    /// Creates a PrintSelection from parsed `print` arguments.
    ///
    /// # Returns
    /// * `Ok(PrintSelection)` with the resolved choices
    /// * `Err(CliError)` if an invalid month was specified
    pub fn from_args(args: &PrintArgs) -> Result<Self, CliError> {
        let month = match (&args.month, args.next) {
            (Some(name), _) => MonthChoice::Named(parse_month_arg(name)?),
            (None, true) => MonthChoice::Next,
            (None, false) => MonthChoice::Current,
        };

        let option = if let Some(name) = &args.option {
            OptionChoice::Named(name.clone())
        } else if args.random {
            OptionChoice::Random
        } else if args.interactive {
            OptionChoice::Interactive
        } else {
            OptionChoice::First
        };

        Ok(PrintSelection {
            month,
            option,
            refresh: args.refresh,
        })
    }
}

/// Builds the full command tree
pub fn command() -> clap::Command {
    Cli::command()
}
