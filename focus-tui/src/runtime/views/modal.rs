use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};
use time::OffsetDateTime;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

fn is_confirm(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y')
    )
}

fn is_cancel(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N')
    )
}

pub(super) fn handle_start_confirm_key(key: KeyEvent, app: &mut App) {
    if is_confirm(&key) {
        app.confirm_start(OffsetDateTime::now_utc());
    } else if is_cancel(&key) {
        app.orchestrator.cancel_selection();
    }
}

pub(super) fn handle_stop_confirm_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if is_confirm(&key) {
        if let Some(record) = app.confirm_stop(OffsetDateTime::now_utc()) {
            enqueue_action(action_tx, Action::PersistSession(record));
        }
    } else if is_cancel(&key) {
        app.orchestrator.cancel_stop();
    }
}

pub(super) fn handle_quit_confirm_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if is_confirm(&key) {
        if let Some(record) = app.confirm_quit(OffsetDateTime::now_utc()) {
            enqueue_action(action_tx, Action::PersistSession(record));
        }
    } else if is_cancel(&key) {
        app.cancel_quit();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{key, test_app};
    use super::*;
    use crate::session::{ModalKind, SessionPhase};
    use focus_client::SessionStatus;

    use super::super::super::action_queue::channel;

    fn running_app() -> App {
        let mut app = test_app();
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());
        app
    }

    #[tokio::test]
    async fn stop_anyway_queues_one_incomplete_record() {
        let mut app = running_app();
        app.request_stop();
        let (tx, mut rx) = channel();

        handle_stop_confirm_key(key(KeyCode::Enter), &mut app, &tx);
        match rx.try_recv().ok() {
            Some(Action::PersistSession(record)) => {
                assert_eq!(record.status, SessionStatus::Incomplete)
            }
            other => panic!("unexpected action: {other:?}"),
        }

        handle_stop_confirm_key(key(KeyCode::Enter), &mut app, &tx);
        assert!(rx.try_recv().is_err());
        assert!(matches!(app.orchestrator.phase(), SessionPhase::Idle));
    }

    #[tokio::test]
    async fn continue_returns_to_running_without_action() {
        let mut app = running_app();
        app.request_stop();
        let (tx, mut rx) = channel();

        handle_stop_confirm_key(key(KeyCode::Esc), &mut app, &tx);
        assert!(rx.try_recv().is_err());
        assert!(matches!(app.orchestrator.phase(), SessionPhase::Running(_)));
    }

    #[test]
    fn cancelling_start_returns_to_idle() {
        let mut app = test_app();
        app.select_highlighted_task();
        assert_eq!(app.modal(), Some(ModalKind::StartConfirm));

        handle_start_confirm_key(key(KeyCode::Char('n')), &mut app);
        assert_eq!(app.modal(), None);
        assert!(matches!(app.orchestrator.phase(), SessionPhase::Idle));
    }
}
