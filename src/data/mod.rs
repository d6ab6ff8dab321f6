//! Core data models for the lunch CLI
//!
//! This module contains the parsed menu types plus the client that retrieves
//! the published CSV files and the parser that turns them into `DailyMenu`s.

pub mod fetch;
pub mod menu;

pub use fetch::{FetchError, MenuClient};
pub use menu::{parse_menu_csv, MenuParseError};

use chrono::NaiveDate;

/// One school day's lunch menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMenu {
    /// The day this menu is served
    pub date: NaiveDate,
    /// Free text following the weekday in the date column, if any
    pub note: Option<String>,
    /// Menu items in published order, whitespace-normalized
    pub items: Vec<String>,
}

impl DailyMenu {
    /// Renders the menu as `<date>: <item>, <item>, ...`
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.date.format("%Y-%m-%d"), self.items.join(", "))
    }
}
