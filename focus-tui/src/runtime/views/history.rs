use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

pub(super) fn handle_history_key(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.history_down(),
        KeyCode::Up | KeyCode::Char('k') => app.history_up(),
        KeyCode::Home => app.history_scroll = 0,
        _ => return false,
    }
    true
}
