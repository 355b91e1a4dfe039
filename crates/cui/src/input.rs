use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Dismiss,
    Activate,
    GuessHigher,
    GuessLower,
    NextRound,
    Restart,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Up => InputAction::GuessHigher,
        KeyCode::Down => InputAction::GuessLower,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('k') | KeyCode::Char('h') => InputAction::GuessHigher,
        KeyCode::Char('j') | KeyCode::Char('l') => InputAction::GuessLower,
        KeyCode::Char('n') | KeyCode::Char(' ') => InputAction::NextRound,
        KeyCode::Char('r') => InputAction::Restart,
        _ => InputAction::None,
    }
}
