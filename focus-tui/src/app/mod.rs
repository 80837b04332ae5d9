use crate::config::FocusConfig;
use crate::session::{
    ModalKind, SessionError, SessionOrchestrator, SharedStore, StoreChange, TimerCommand,
    TimerEvent, TimerSettings,
};
use focus_client::{NewSession, NewTask, Session, Task};
use ratatui::layout::Rect;
use time::OffsetDateTime;
use tokio::sync::broadcast::error::TryRecvError as BroadcastTryRecvError;
use tokio::sync::{broadcast, mpsc};

mod form;
mod notices;
mod state;
pub use form::TaskForm;
pub use notices::{NoticeLevel, Notices};
pub use state::{FormField, Pane, TextInput};

pub struct App {
    pub running: bool,
    pub focused_pane: Pane,

    pub tasks: Vec<Task>,
    pub task_index: usize,
    pub sessions: Vec<Session>,
    pub history_scroll: usize,
    pub history_view_height: usize, // Last-rendered inner height (updated by renderer each frame)

    pub form: TaskForm,
    pub notices: Notices,

    /// Records whose write failed; kept until retried or dismissed.
    pub pending_sessions: Vec<NewSession>,

    pub orchestrator: SessionOrchestrator,
    pub store: SharedStore,
    timer_events: mpsc::UnboundedReceiver<TimerEvent>,
    store_changes: broadcast::Receiver<StoreChange>,

    pub confirm_quit: bool,
    /// Unsaved records the user accepted losing when confirming the quit.
    quit_accepted_pending: usize,

    // Terminal geometry, updated by the renderer each frame
    pub viewport: (u16, u16),
    pub timer_panel_area: Option<Rect>,
    last_alert_seq: u64,
}

impl App {
    pub fn new(cfg: &FocusConfig) -> Self {
        let store = SharedStore::new();
        let store_changes = store.subscribe();
        let (orchestrator, timer_events) =
            SessionOrchestrator::new(TimerSettings::from_config(cfg), store.clone());
        Self {
            running: true,
            focused_pane: Pane::Tasks,
            tasks: Vec::new(),
            task_index: 0,
            sessions: Vec::new(),
            history_scroll: 0,
            history_view_height: 0,
            form: TaskForm::default(),
            notices: Notices::default(),
            pending_sessions: Vec::new(),
            orchestrator,
            store,
            timer_events,
            store_changes,
            confirm_quit: false,
            quit_accepted_pending: 0,
            viewport: (80, 24),
            timer_panel_area: None,
            last_alert_seq: 0,
        }
    }

    /// Quit, or ask first when a session is running or records are unsaved.
    pub fn request_quit(&mut self) {
        if self.orchestrator.is_running() || !self.pending_sessions.is_empty() {
            self.confirm_quit = true;
        } else {
            self.quit_accepted_pending = 0;
            self.running = false;
        }
    }

    /// Confirm the quit dialog. The running session is recorded as incomplete.
    pub fn confirm_quit(&mut self, now: OffsetDateTime) -> Option<NewSession> {
        self.confirm_quit = false;
        self.running = false;
        self.quit_accepted_pending = self.pending_sessions.len();
        self.orchestrator.abandon(now)
    }

    /// Run after the actions queued by a quit have executed. Returns whether the
    /// app may exit; a record that failed to save during the quit keeps it open.
    pub fn settle_quit(&mut self) -> bool {
        if self.running {
            return false;
        }
        let unsaved = self.pending_sessions.len();
        if unsaved > self.quit_accepted_pending {
            self.running = true;
            tracing::warn!(unsaved, "quit held back by unsaved sessions");
            self.notices.error(format!(
                "{unsaved} session(s) not saved. Press r to retry or d to dismiss, then quit again"
            ));
            return false;
        }
        true
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn modal(&self) -> Option<ModalKind> {
        self.orchestrator.modal()
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.task_index = self.task_index.min(self.tasks.len().saturating_sub(1));
    }

    pub fn set_sessions(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
        self.history_scroll = self
            .history_scroll
            .min(self.sessions.len().saturating_sub(1));
    }

    /// Cache a task the backend accepted but that a re-fetch failed to return.
    pub fn append_task(&mut self, task: Task) {
        if !self.tasks.iter().any(|t| t.id == task.id) {
            self.tasks.push(task);
        }
    }

    pub fn highlighted_task(&self) -> Option<&Task> {
        self.tasks.get(self.task_index)
    }

    pub fn task_down(&mut self) {
        if self.task_index + 1 < self.tasks.len() {
            self.task_index += 1;
        }
    }

    pub fn task_up(&mut self) {
        self.task_index = self.task_index.saturating_sub(1);
    }

    pub fn history_down(&mut self) {
        let visible = self.history_view_height.max(1);
        let max_scroll = self.sessions.len().saturating_sub(visible);
        if self.history_scroll < max_scroll {
            self.history_scroll += 1;
        }
    }

    pub fn history_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    fn focus_order(&self) -> Vec<Pane> {
        let mut order = vec![Pane::Form, Pane::Tasks, Pane::History];
        if self.orchestrator.timer_snapshot().is_some() {
            order.push(Pane::Timer);
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|p| *p == self.focused_pane);
        self.focused_pane = match pos {
            Some(i) => order[(i + 1) % order.len()],
            None => Pane::Tasks,
        };
    }

    pub fn focus_previous(&mut self) {
        let order = self.focus_order();
        let pos = order.iter().position(|p| *p == self.focused_pane);
        self.focused_pane = match pos {
            Some(i) => order[(i + order.len() - 1) % order.len()],
            None => Pane::Tasks,
        };
    }

    /// Validate the form; failures become notices.
    pub fn submit_form(&mut self) -> Option<NewTask> {
        match self.form.submit() {
            Ok(task) => Some(task),
            Err(e) => {
                self.notices.error(e.to_string());
                None
            }
        }
    }

    /// Open the start dialog for the highlighted task.
    pub fn select_highlighted_task(&mut self) {
        let Some(task_id) = self.highlighted_task().map(|t| t.id) else {
            self.notices.error("No task selected");
            return;
        };
        if let Err(e) = self.orchestrator.select_task(&self.tasks, task_id) {
            self.notices.error(e.to_string());
        }
    }

    pub fn confirm_start(&mut self, now: OffsetDateTime) {
        match self.orchestrator.confirm_start(self.viewport, now) {
            Ok(_) => {
                let name = self
                    .orchestrator
                    .selected_task()
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                self.notices.success(format!("Session started for {name}"));
                self.focused_pane = Pane::Timer;
            }
            Err(e @ (SessionError::Validation(_) | SessionError::PopupBlocked(_))) => {
                self.notices.error(e.to_string());
            }
            Err(e) => self.notices.error(format!("Could not start session: {e}")),
        }
    }

    pub fn request_stop(&mut self) {
        if !self.orchestrator.request_stop() {
            self.notices.info("No session is running");
        }
    }

    pub fn confirm_stop(&mut self, now: OffsetDateTime) -> Option<NewSession> {
        let record = self.orchestrator.confirm_stop(now);
        self.leave_timer_pane();
        record
    }

    pub fn send_timer_command(&mut self, command: TimerCommand) {
        if !self.orchestrator.send_timer_command(command) {
            self.leave_timer_pane();
        }
    }

    /// Apply every timer event received since the last call. Returns the records
    /// that need persisting.
    pub fn drain_timer_events(&mut self) -> Vec<NewSession> {
        let mut records = Vec::new();
        while let Ok(event) = self.timer_events.try_recv() {
            if let Some(record) = self.orchestrator.handle_timer_event(event) {
                records.push(record);
            }
        }
        self.leave_timer_pane();
        records
    }

    /// Apply every shared store change received since the last call.
    pub fn drain_store_changes(&mut self) -> Vec<NewSession> {
        let mut records = Vec::new();
        loop {
            match self.store_changes.try_recv() {
                Ok(change) => {
                    if let Some(record) = self.orchestrator.handle_store_change(&change) {
                        records.push(record);
                    }
                }
                Err(BroadcastTryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "missed shared store changes");
                }
                Err(BroadcastTryRecvError::Empty | BroadcastTryRecvError::Closed) => break,
            }
        }
        self.leave_timer_pane();
        records
    }

    pub fn poll_liveness(&mut self) {
        if self.orchestrator.poll_liveness() {
            self.notices.info("Timer window was closed");
        }
        self.leave_timer_pane();
    }

    /// Whether the timer window raised a new alert since the last call. An alert
    /// also moves focus to the timer panel.
    pub fn take_alert(&mut self) -> bool {
        let Some(snapshot) = self.orchestrator.timer_snapshot() else {
            self.last_alert_seq = 0;
            return false;
        };
        if snapshot.alert_seq > self.last_alert_seq {
            self.last_alert_seq = snapshot.alert_seq;
            self.focused_pane = Pane::Timer;
            true
        } else {
            false
        }
    }

    pub fn hold_pending(&mut self, record: NewSession) {
        if !self.pending_sessions.contains(&record) {
            self.pending_sessions.push(record);
        }
    }

    pub fn dismiss_pending(&mut self) {
        let dropped = self.pending_sessions.len();
        self.pending_sessions.clear();
        if dropped > 0 {
            tracing::warn!(dropped, "unsaved session records dismissed");
            self.notices
                .success(format!("Dismissed {dropped} unsaved session(s)"));
        }
    }

    fn leave_timer_pane(&mut self) {
        if self.focused_pane == Pane::Timer && self.orchestrator.timer_snapshot().is_none() {
            self.focused_pane = Pane::Tasks;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionPhase, SESSION_DATA_KEY};
    use focus_client::{SessionStatus, TaskId};

    fn task(id: i64, duration: i64) -> Task {
        Task {
            id: TaskId::new(id),
            name: format!("Task {id}"),
            description: None,
            duration: Some(duration),
        }
    }

    fn test_app() -> App {
        let mut app = App::new(&FocusConfig::default());
        app.set_tasks(vec![task(1, 5), task(2, 10)]);
        app.viewport = (120, 40);
        app
    }

    #[test]
    fn quit_without_session_exits_immediately() {
        let mut app = test_app();
        app.request_quit();
        assert!(!app.running);
        assert!(!app.confirm_quit);
    }

    #[tokio::test]
    async fn quit_while_running_asks_first_and_records_incomplete() {
        let mut app = test_app();
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());
        assert!(app.orchestrator.is_running());

        app.request_quit();
        assert!(app.running);
        assert!(app.confirm_quit);

        app.cancel_quit();
        assert!(app.running);
        assert!(app.orchestrator.is_running());

        app.request_quit();
        let record = app.confirm_quit(OffsetDateTime::now_utc()).unwrap();
        assert_eq!(record.status, SessionStatus::Incomplete);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn blocked_start_is_reported_and_dialog_stays() {
        let mut app = test_app();
        app.viewport = (20, 5);
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());

        assert_eq!(app.modal(), Some(ModalKind::StartConfirm));
        assert!(app.notices.has_errors());
        assert!(app
            .notices
            .latest()
            .unwrap()
            .message
            .starts_with("Timer window blocked"));
    }

    #[tokio::test]
    async fn store_record_is_drained_once() {
        let mut app = test_app();
        let now = OffsetDateTime::now_utc();
        let record = NewSession::new(TaskId::new(2), now, now, SessionStatus::Completed);
        app.store
            .set(SESSION_DATA_KEY, serde_json::to_string(&record).unwrap());

        assert_eq!(app.drain_store_changes(), vec![record]);
        // The removal notification that follows is not a record.
        assert!(app.drain_store_changes().is_empty());
    }

    #[tokio::test]
    async fn confirmed_stop_records_and_leaves_timer_pane() {
        let mut app = test_app();
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());
        let snapshot = app.orchestrator.timer_snapshot().unwrap();
        assert_eq!(snapshot.total_secs, 300);

        app.request_stop();
        let record = app.confirm_stop(OffsetDateTime::now_utc()).unwrap();
        assert_eq!(record.task_id, TaskId::new(1));
        assert!(matches!(app.orchestrator.phase(), SessionPhase::Idle));
        assert_ne!(app.focused_pane, Pane::Timer);
    }

    #[test]
    fn quit_with_unsaved_records_asks_first() {
        let mut app = test_app();
        let now = OffsetDateTime::now_utc();
        app.hold_pending(NewSession::new(TaskId::new(1), now, now, SessionStatus::Completed));

        app.request_quit();
        assert!(app.running);
        assert!(app.confirm_quit);

        app.cancel_quit();
        assert!(app.running);
        assert_eq!(app.pending_sessions.len(), 1);

        // Confirming accepts losing the records already listed.
        app.request_quit();
        assert_eq!(app.confirm_quit(now), None);
        assert!(app.settle_quit());
    }

    #[tokio::test]
    async fn quit_record_that_fails_to_save_keeps_app_open() {
        let mut app = test_app();
        app.select_highlighted_task();
        app.confirm_start(OffsetDateTime::now_utc());

        app.request_quit();
        let record = app.confirm_quit(OffsetDateTime::now_utc()).unwrap();
        assert!(!app.running);

        // The incomplete record could not be written.
        app.hold_pending(record);
        assert!(!app.settle_quit());
        assert!(app.running);
        assert!(app.notices.has_errors());
        assert_eq!(app.pending_sessions.len(), 1);
    }

    #[test]
    fn pending_records_are_not_duplicated() {
        let mut app = test_app();
        let now = OffsetDateTime::now_utc();
        let record = NewSession::new(TaskId::new(1), now, now, SessionStatus::Incomplete);
        app.hold_pending(record.clone());
        app.hold_pending(record);
        assert_eq!(app.pending_sessions.len(), 1);

        app.dismiss_pending();
        assert!(app.pending_sessions.is_empty());
    }

    #[test]
    fn task_cursor_stays_in_bounds() {
        let mut app = test_app();
        app.task_down();
        app.task_down();
        assert_eq!(app.task_index, 1);
        app.set_tasks(vec![task(3, 5)]);
        assert_eq!(app.task_index, 0);
        app.task_up();
        assert_eq!(app.highlighted_task().unwrap().id, TaskId::new(3));
    }

    #[test]
    fn timer_pane_is_only_focusable_with_an_open_window() {
        let mut app = test_app();
        app.focused_pane = Pane::History;
        app.focus_next();
        assert_eq!(app.focused_pane, Pane::Form);
        app.focus_previous();
        assert_eq!(app.focused_pane, Pane::History);
    }
}
