use crate::app::{App, Pane};
use crate::session::ModalKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod form;
mod history;
mod modal;
mod mouse;
mod tasks;
mod timer;

pub(super) use mouse::handle_mouse;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.confirm_quit {
        modal::handle_quit_confirm_key(key, app, action_tx);
        return;
    }
    match app.modal() {
        Some(ModalKind::StartConfirm) => modal::handle_start_confirm_key(key, app),
        Some(ModalKind::StopConfirm) => modal::handle_stop_confirm_key(key, app, action_tx),
        None => handle_main_key(key, app, action_tx),
    }
}

fn handle_main_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.request_quit();
            return;
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            enqueue_action(action_tx, Action::ReloadAll);
            return;
        }
        KeyCode::Tab => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab => {
            app.focus_previous();
            return;
        }
        _ => {}
    }

    // The form takes plain characters as text.
    if app.focused_pane == Pane::Form {
        form::handle_form_key(key, app, action_tx);
        return;
    }

    let handled = match app.focused_pane {
        Pane::Tasks => tasks::handle_tasks_key(key, app),
        Pane::History => history::handle_history_key(key, app),
        Pane::Timer => timer::handle_timer_key(key, app),
        Pane::Form => false,
    };
    if handled {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.request_quit(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.focused_pane = Pane::Form,
        KeyCode::Char('s') | KeyCode::Char('S') => app.request_stop(),
        KeyCode::Char('r') => enqueue_action(action_tx, Action::RetryPendingSessions),
        KeyCode::Char('d') => app.dismiss_pending(),
        KeyCode::Esc => {
            app.notices.dismiss();
        }
        _ => {}
    }
}
