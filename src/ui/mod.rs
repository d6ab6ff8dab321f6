//! Terminal UI for the lunch CLI
//!
//! Holds the interactive option picker, drawn with ratatui on a crossterm backend.

pub mod option_picker;

pub use option_picker::{pick_option, OptionPicker, PickerAction, PromptError};
