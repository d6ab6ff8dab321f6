//! Top-level error type for the lunch CLI
//!
//! Every module error converts into `AppError`; any of them ends the run.

use thiserror::Error;

use crate::cli::CliError;
use crate::config::ConfigError;
use crate::data::{FetchError, MenuParseError};
use crate::ui::PromptError;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed config document
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command-line selection
    #[error("{0}")]
    Cli(#[from] CliError),

    /// Download or cache failure
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The menu file could not be parsed
    #[error("Menu error: {0}")]
    Parse(#[from] MenuParseError),

    /// Interactive selection failed or was cancelled
    #[error("{0}")]
    Prompt(#[from] PromptError),

    /// No cache directory given and none could be determined
    #[error("Could not determine a cache directory; pass --cache-dir")]
    NoCacheDir,

    /// Writing the listing failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
