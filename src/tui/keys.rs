//! Key bindings for the form screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::Field;

pub const HELP: &str =
    "Tab/↑/↓ field  Ctrl+S submit  Ctrl+R reset  Esc dismiss  Ctrl+D debug  Ctrl+Q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    Reset,
    Dismiss,
    DebugBundle,
    NextField,
    PrevField,
    Insert(char),
    Backspace,
    None,
}

/// Translate a key press given which field has focus.
pub fn map_key(key: KeyEvent, focus: Field) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('s') => Action::Submit,
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('d') => Action::DebugBundle,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Dismiss,
        KeyCode::Tab | KeyCode::Down => Action::NextField,
        KeyCode::BackTab | KeyCode::Up => Action::PrevField,
        KeyCode::Enter if focus.is_multiline() => Action::Insert('\n'),
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::Insert(c),
        _ => Action::None,
    }
}
