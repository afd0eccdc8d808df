//! Key bindings. Screens decide what a printable character means; this only
//! separates text from control keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Char(char),
    Space,
    Backspace,
    /// Tab: restart the current game.
    Restart,
    /// Enter.
    Confirm,
    /// Esc: back to the menu.
    Back,
    Up,
    Down,
    Left,
    Right,
    /// Ctrl-C, from any screen.
    Quit,
    None,
}

/// Map a key event to an action. Releases and anything chorded with Ctrl/Alt
/// (other than Ctrl-C) are ignored.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code,
        modifiers,
        kind,
        ..
    } = key;
    if kind == KeyEventKind::Release {
        return Action::None;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c' | 'C') => Action::Quit,
            _ => Action::None,
        };
    }
    if modifiers.contains(KeyModifiers::ALT) {
        return Action::None;
    }
    match code {
        KeyCode::Char(' ') => Action::Space,
        KeyCode::Char(c) => Action::Char(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Tab => Action::Restart,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Back,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        _ => Action::None,
    }
}
