use crate::app::App;
use crate::session::TimerCommand;
use crossterm::event::{KeyCode, KeyEvent};

/// Keys for the focused timer panel: its own Stop and close controls.
pub(super) fn handle_timer_key(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Enter | KeyCode::Char('s') | KeyCode::Char('S') => {
            app.send_timer_command(TimerCommand::StopPressed)
        }
        KeyCode::Char('x') | KeyCode::Char('X') => {
            app.send_timer_command(TimerCommand::CloseRequested)
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::super::tests::{key, test_app};
    use super::*;
    use crate::session::ModalKind;
    use time::OffsetDateTime;

    #[tokio::test]
    async fn close_control_leads_to_stop_dialog() {
        let mut app = test_app();
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());

        assert!(handle_timer_key(key(KeyCode::Char('x')), &mut app));
        for _ in 0..10 {
            tokio::task::yield_now().await;
            app.drain_timer_events();
            if app.modal().is_some() {
                break;
            }
        }
        assert_eq!(app.modal(), Some(ModalKind::StopConfirm));
    }

    #[tokio::test]
    async fn stop_control_before_zero_only_warns() {
        let mut app = test_app();
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());

        handle_timer_key(key(KeyCode::Enter), &mut app);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        app.drain_timer_events();

        assert_eq!(app.modal(), None);
        let snapshot = app.orchestrator.timer_snapshot().unwrap();
        assert_eq!(
            snapshot.notice.as_deref(),
            Some("You cannot stop before time ends!")
        );
    }
}
