use crate::app::{App, Pane};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_form_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Enter => {
            if let Some(task) = app.submit_form() {
                enqueue_action(action_tx, Action::CreateTask(task));
            }
        }
        KeyCode::Esc => app.focused_pane = Pane::Tasks,
        KeyCode::Down => app.form.next_field(),
        KeyCode::Up => app.form.previous_field(),
        KeyCode::Char('x') | KeyCode::Char('X')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.form.focused_input_mut().clear();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.focused_input_mut().insert(c);
        }
        KeyCode::Backspace => app.form.focused_input_mut().backspace(),
        KeyCode::Left => app.form.focused_input_mut().move_left(),
        KeyCode::Right => app.form.focused_input_mut().move_right(),
        KeyCode::Home => app.form.focused_input_mut().home(),
        KeyCode::End => app.form.focused_input_mut().end(),
        _ => {}
    }
}
