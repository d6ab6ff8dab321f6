//! Menu CSV parser
//!
//! The published files have a header row followed by one row per school day.
//! The first column holds a label like `September 3; 2025?Wednesday`, optionally
//! followed by a note, and the second column holds the day's items separated
//! by `|`. Rows labelled `Daily Offerings` are spacers and carry no date.

use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::DailyMenu;

/// First-column label of spacer rows
pub const SENTINEL_LABEL: &str = "Daily Offerings";

/// Separator between items in the menu column
const ITEM_SEPARATOR: char = '|';

/// chrono format of the day portion, before the `?`
const DATE_FORMAT: &str = "%B %d; %Y";

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<day>\S+ \d+; \d+)\?(?P<weekday>\S+)\s*(?P<note>.+)?$")
        .expect("valid date regex")
});

/// ASCII whitespace only; non-breaking spaces inside items are left alone
static EXCESS_WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\s){2,}").expect("valid whitespace regex"));

/// Errors that can occur when parsing a menu file
#[derive(Debug, Error)]
pub enum MenuParseError {
    /// The body is not well-formed CSV
    #[error("Failed to read menu CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A row's date column does not have the expected shape
    #[error("record \"{0}\": invalid lunch record")]
    InvalidRecord(String),

    /// The date column matched but is not a real calendar date
    #[error("record \"{raw}\": invalid date: {source}")]
    DateParse {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The text after `?` is not a weekday name
    #[error("record \"{raw}\": invalid weekday: {source}")]
    InvalidWeekday {
        raw: String,
        #[source]
        source: chrono::ParseWeekdayError,
    },
}

/// Parses a whole menu file into one `DailyMenu` per dated row, in file order
pub fn parse_menu_csv(raw: &str) -> Result<Vec<DailyMenu>, MenuParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(raw.as_bytes());

    let mut menus = Vec::new();
    for record in reader.records() {
        let record = record?;
        let label = record.get(0).unwrap_or_default();

        if label == SENTINEL_LABEL {
            log::debug!("Skipping '{}' row", SENTINEL_LABEL);
            continue;
        }

        let items = record
            .get(1)
            .ok_or_else(|| MenuParseError::InvalidRecord(label.to_string()))?;

        menus.push(parse_row(label, items)?);
    }

    Ok(menus)
}

/// Parses one dated row from its label and menu columns
pub fn parse_row(label: &str, items: &str) -> Result<DailyMenu, MenuParseError> {
    let captures = DATE_RE
        .captures(label)
        .ok_or_else(|| MenuParseError::InvalidRecord(label.to_string()))?;

    let date = NaiveDate::parse_from_str(&captures["day"], DATE_FORMAT).map_err(|source| {
        MenuParseError::DateParse {
            raw: label.to_string(),
            source,
        }
    })?;

    let weekday = captures["weekday"]
        .parse::<Weekday>()
        .map_err(|source| MenuParseError::InvalidWeekday {
            raw: label.to_string(),
            source,
        })?;
    // The published weekday is informational; the date wins
    if weekday != date.weekday() {
        log::warn!(
            "record \"{}\": {} is a {}, not a {}",
            label,
            date,
            date.weekday(),
            weekday
        );
    }

    let note = captures.name("note").map(|m| m.as_str().to_string());

    Ok(DailyMenu {
        date,
        note,
        items: split_items(items),
    })
}

/// Splits the menu column on `|` and normalizes whitespace in each item
///
/// Empty items are kept.
pub fn split_items(column: &str) -> Vec<String> {
    column.split(ITEM_SEPARATOR).map(normalize_item).collect()
}

/// Collapses runs of two or more whitespace characters into one space, then trims
fn normalize_item(item: &str) -> String {
    EXCESS_WHITESPACE_RE
        .replace_all(item, " ")
        .trim()
        .to_string()
}
