//! Application state and the `print` command
//!
//! `App` owns the loaded configuration and the menu client. Handlers receive
//! both explicitly instead of looking them up from shared state.

use std::io::Write;

use chrono::Month;
use rand::seq::IndexedRandom;

use crate::cli::{CliError, OptionChoice, PrintSelection};
use crate::config::{month_segment, LunchConfig, MenuOption};
use crate::data::{parse_menu_csv, DailyMenu, MenuClient};
use crate::error::AppError;
use crate::ui;

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Configuration loaded at startup
    pub config: LunchConfig,
    /// Client used to retrieve menu files
    pub client: MenuClient,
}

impl App {
    pub fn new(config: LunchConfig, client: MenuClient) -> Self {
        Self { config, client }
    }

    /// Fetches, parses and prints one month of menus for the selected option
    pub async fn run_print<W: Write>(
        &self,
        selection: &PrintSelection,
        current_month: Month,
        out: &mut W,
    ) -> Result<(), AppError> {
        let option = select_option(&self.config, &selection.option)?;
        let month = selection.month.resolve(current_month);
        log::info!("Printing {} for {}", option.name, month_segment(month));

        let raw = self.client.fetch(&self.config, option, month).await?;
        let menus = parse_menu_csv(&raw)?;
        if menus.is_empty() {
            log::warn!("No menus found for {} in {}", option.name, month.name());
        }

        write_listing(&menus, out)?;
        Ok(())
    }
}

/// Picks the menu option described by `choice`
pub fn select_option<'a>(
    config: &'a LunchConfig,
    choice: &OptionChoice,
) -> Result<&'a MenuOption, AppError> {
    let option = match choice {
        OptionChoice::First => config.options.first(),
        OptionChoice::Named(name) => Some(config.find_option(name).ok_or_else(|| {
            CliError::UnknownOption {
                name: name.clone(),
                available: option_names(config),
            }
        })?),
        OptionChoice::Random => config.options.choose(&mut rand::rng()),
        OptionChoice::Interactive => Some(ui::pick_option(&config.options)?),
    };

    option.ok_or_else(|| crate::config::ConfigError::NoOptions.into())
}

fn option_names(config: &LunchConfig) -> String {
    config
        .options
        .iter()
        .map(|option| option.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Writes one `<date>: <items>` line per menu, in order
pub fn write_listing<W: Write>(menus: &[DailyMenu], out: &mut W) -> std::io::Result<()> {
    for menu in menus {
        writeln!(out, "{}", menu.to_line())?;
    }
    out.flush()
}
