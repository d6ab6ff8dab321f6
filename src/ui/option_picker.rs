//! Interactive menu option picker
//!
//! Renders a single-select list of the configured menu options in the
//! terminal and returns the one the user picks.

use std::io::{self, IsTerminal};
use std::panic;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use thiserror::Error;

use crate::config::MenuOption;

/// Errors that can occur while prompting for an option
#[derive(Debug, Error)]
pub enum PromptError {
    /// Terminal setup, drawing or input failed
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),

    /// The user closed the prompt without choosing
    #[error("No menu option selected")]
    Cancelled,

    /// Stdout is not a terminal
    #[error("Interactive selection requires a terminal")]
    NotATerminal,
}

/// What a key press asks the picker to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    /// Keep prompting
    Continue,
    /// The option at this index was chosen
    Select(usize),
    /// The prompt was dismissed
    Cancel,
}

/// Selection state for the option list
#[derive(Debug)]
pub struct OptionPicker<'a> {
    options: &'a [MenuOption],
    selected_index: usize,
}

impl<'a> OptionPicker<'a> {
    pub fn new(options: &'a [MenuOption]) -> Self {
        Self {
            options,
            selected_index: 0,
        }
    }

    /// Index of the highlighted option
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Handles a key press
    pub fn handle_key(&mut self, key_event: KeyEvent) -> PickerAction {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => PickerAction::Cancel,
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
                PickerAction::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
                PickerAction::Continue
            }
            KeyCode::Enter if !self.options.is_empty() => {
                PickerAction::Select(self.selected_index)
            }
            _ => PickerAction::Continue,
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.options.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.options.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Renders the option list and a help line
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|option| ListItem::new(option.name.as_str()))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Choose a menu ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.selected_index));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("↑/k ↓/j", Style::default().fg(Color::Cyan)),
            Span::raw(" move  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" select  "),
            Span::styled("Esc/q", Style::default().fg(Color::Cyan)),
            Span::raw(" cancel"),
        ]));
        frame.render_widget(help, chunks[1]);
    }
}

/// Restores the terminal before a panic message is printed
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Prompts for one of `options` in the terminal
pub fn pick_option(options: &[MenuOption]) -> Result<&MenuOption, PromptError> {
    if !io::stdout().is_terminal() {
        return Err(PromptError::NotATerminal);
    }

    setup_panic_hook();
    enable_raw_mode()?;

    let index = with_restore(
        || {
            execute!(io::stdout(), EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
            let mut picker = OptionPicker::new(options);
            run_picker(&mut terminal, &mut picker)
        },
        restore_terminal,
    )?;

    Ok(&options[index])
}

/// Runs `body`, then `restore`, whether or not `body` failed
///
/// A `body` error takes precedence over a `restore` error.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T, PromptError>,
    restore: impl FnOnce() -> io::Result<()>,
) -> Result<T, PromptError> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

/// Leaves raw mode and the alternate screen and shows the cursor again
fn restore_terminal() -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    raw
}

fn run_picker<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    picker: &mut OptionPicker,
) -> Result<usize, PromptError> {
    loop {
        terminal.draw(|frame| picker.render(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match picker.handle_key(key) {
                PickerAction::Continue => {}
                PickerAction::Select(index) => return Ok(index),
                PickerAction::Cancel => return Err(PromptError::Cancelled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn options() -> Vec<MenuOption> {
        ["Cold Lunch", "Hot Lunch", "Breakfast"]
            .iter()
            .map(|name| MenuOption {
                name: name.to_string(),
                path: name.replace(' ', "-"),
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_selects_first_by_default() {
        let options = options();
        let mut picker = OptionPicker::new(&options);
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerAction::Select(0));
    }

    #[test]
    fn test_down_then_enter() {
        let options = options();
        let mut picker = OptionPicker::new(&options);
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Char('j')));
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerAction::Select(2));
    }

    #[test]
    fn test_selection_wraps() {
        let options = options();
        let mut picker = OptionPicker::new(&options);

        picker.handle_key(key(KeyCode::Up));
        assert_eq!(picker.selected_index(), 2);

        picker.handle_key(key(KeyCode::Char('j')));
        assert_eq!(picker.selected_index(), 0);

        picker.handle_key(key(KeyCode::Char('k')));
        assert_eq!(picker.selected_index(), 2);
    }

    #[test]
    fn test_escape_and_q_cancel() {
        let options = options();
        let mut picker = OptionPicker::new(&options);
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), PickerAction::Cancel);
        assert_eq!(picker.handle_key(key(KeyCode::Char('q'))), PickerAction::Cancel);
    }

    #[test]
    fn test_empty_list_never_selects() {
        let mut picker = OptionPicker::new(&[]);
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), PickerAction::Continue);
    }

    #[test]
    fn test_restore_runs_when_setup_fails() {
        let restored = std::cell::Cell::new(false);

        let result: Result<usize, PromptError> = with_restore(
            || Err(io::Error::new(io::ErrorKind::Other, "no alternate screen").into()),
            || {
                restored.set(true);
                Ok(())
            },
        );

        assert!(matches!(result, Err(PromptError::Io(_))));
        assert!(restored.get(), "Terminal should be restored after a setup error");
    }

    #[test]
    fn test_restore_runs_after_cancel_and_success() {
        let restores = std::cell::Cell::new(0);
        let restore = || {
            restores.set(restores.get() + 1);
            Ok(())
        };

        let cancelled: Result<usize, PromptError> =
            with_restore(|| Err(PromptError::Cancelled), restore);
        let selected = with_restore(|| Ok(1), restore);

        assert!(matches!(cancelled, Err(PromptError::Cancelled)));
        assert_eq!(selected.unwrap(), 1);
        assert_eq!(restores.get(), 2);
    }

    #[test]
    fn test_body_error_wins_over_restore_error() {
        let result: Result<usize, PromptError> = with_restore(
            || Err(PromptError::Cancelled),
            || Err(io::Error::new(io::ErrorKind::Other, "restore failed")),
        );

        assert!(matches!(result, Err(PromptError::Cancelled)));
    }

    #[test]
    fn test_render_shows_option_names() {
        let options = options();
        let picker = OptionPicker::new(&options);
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();

        terminal.draw(|frame| picker.render(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Choose a menu"));
        assert!(text.contains("Cold Lunch"));
        assert!(text.contains("Hot Lunch"));
        assert!(text.contains("> Cold Lunch"));
    }
}
