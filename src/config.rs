//! Lunch menu configuration
//!
//! Loads the YAML document describing the school year, the base URL the menus
//! are published under, and the list of menu options that can be printed.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Month;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// File name looked up in the working directory and the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config file at the expected location
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),

    /// The config file exists but could not be read
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for a `LunchConfig`
    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config lists no menu options
    #[error("Config must define at least one menu option")]
    NoOptions,
}

/// One selectable menu variant, e.g. "High School Express Cold Lunch Menu"
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuOption {
    /// Human-readable name shown in prompts and logs
    pub name: String,
    /// URL path fragment identifying the CSV file
    pub path: String,
}

/// The loaded configuration document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LunchConfig {
    /// School year segment, e.g. "2025-2026"
    pub school_year: String,
    /// URL prefix all menu files live under
    pub base_path: String,
    /// Menu options in the order they were configured
    pub options: Vec<MenuOption>,
}

impl LunchConfig {
    /// Parses and validates a config document
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: LunchConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.options.is_empty() {
            return Err(ConfigError::NoOptions);
        }

        Ok(config)
    }

    /// Loads the config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml(&content, path)?;
        log::debug!(
            "Loaded config from {:?} ({} options)",
            path,
            config.options.len()
        );
        Ok(config)
    }

    /// Loads the config from `path` if given, otherwise from the default location
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&default_config_path()),
        }
    }

    /// Returns the URL of the CSV file for an option and month
    ///
    /// `{basePath}/{schoolYear}/{month}/{path}.csv`, with the month lower-cased.
    pub fn url_for(&self, option: &MenuOption, month: Month) -> String {
        format!(
            "{}/{}/{}/{}.csv",
            self.base_path.trim_end_matches('/'),
            self.school_year,
            month_segment(month),
            option.path
        )
    }

    /// Returns the cache key for an option and month
    pub fn cache_key(&self, option: &MenuOption, month: Month) -> String {
        format!(
            "{}-{}-{}",
            self.school_year,
            month_segment(month),
            option.path
        )
    }

    /// Finds an option by display name or path, ignoring case
    pub fn find_option(&self, name: &str) -> Option<&MenuOption> {
        self.options.iter().find(|option| {
            option.name.eq_ignore_ascii_case(name) || option.path.eq_ignore_ascii_case(name)
        })
    }
}

/// Lower-cased month name as used in URLs and cache keys
pub fn month_segment(month: Month) -> String {
    month.name().to_lowercase()
}

/// Resolves the config location when none is given on the command line
///
/// Prefers `./config.yaml`, then `~/.config/lunch/config.yaml` (or the
/// platform equivalent).
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }

    ProjectDirs::from("", "", "lunch")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or(local)
}
