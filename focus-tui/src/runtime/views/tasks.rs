use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

/// Returns whether the key was consumed.
pub(super) fn handle_tasks_key(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.task_down(),
        KeyCode::Up | KeyCode::Char('k') => app.task_up(),
        KeyCode::Enter | KeyCode::Char(' ') => app.select_highlighted_task(),
        _ => return false,
    }
    true
}
