use focus_client::{NewSession, SessionStatus, Task, TaskId};
use std::mem;
use time::OffsetDateTime;
use tokio::sync::mpsc;

use super::error::SessionError;
use super::launch::timer_location;
use super::messages::{RunId, TimerCommand, TimerEvent, TimerEventKind, TimerSnapshot, TimerStart};
use super::store::{SharedStore, StoreChange, SESSION_DATA_KEY};
use super::timer_window::{TimerSettings, TimerWindow};

const INVALID_TASK: &str = "Please select a valid task with a positive numeric duration";
const ALREADY_RUNNING: &str = "A session is already running. Stop it before starting another.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    StartConfirm,
    StopConfirm,
}

/// A session between confirm-start and its recorded outcome.
#[derive(Debug)]
pub struct ActiveRun {
    pub run: RunId,
    pub task: Task,
    pub started_at: OffsetDateTime,
    window: Option<TimerWindow>,
}

impl ActiveRun {
    pub fn window(&self) -> Option<&TimerWindow> {
        self.window.as_ref()
    }

    fn close_window(&mut self) {
        if let Some(window) = self.window.take() {
            if !window.is_closed() {
                window.close();
            }
        }
    }

    fn record(&self, ended_at: OffsetDateTime, status: SessionStatus) -> Option<NewSession> {
        if self.task.id.is_unset() {
            tracing::warn!(run = %self.run, "run has no task id, nothing to record");
            return None;
        }
        Some(NewSession::new(self.task.id, self.started_at, ended_at, status))
    }
}

#[derive(Debug, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Selecting(Task),
    Running(ActiveRun),
    StopConfirm(ActiveRun),
}

/// Owns the session lifecycle: selection, the timer window, stop confirmation and
/// the record each run produces. Records are returned to the caller, which is
/// responsible for persisting them.
pub struct SessionOrchestrator {
    phase: SessionPhase,
    settings: TimerSettings,
    store: SharedStore,
    events: mpsc::UnboundedSender<TimerEvent>,
    next_run: u64,
    /// Task and start time of the last run that produced a record.
    finished: Option<(TaskId, OffsetDateTime)>,
}

impl SessionOrchestrator {
    /// Returns the orchestrator and the receiving end of its timer windows' events.
    pub fn new(
        settings: TimerSettings,
        store: SharedStore,
    ) -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        (
            Self {
                phase: SessionPhase::Idle,
                settings,
                store,
                events,
                next_run: 1,
                finished: None,
            },
            events_rx,
        )
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn modal(&self) -> Option<ModalKind> {
        match self.phase {
            SessionPhase::Selecting(_) => Some(ModalKind::StartConfirm),
            SessionPhase::StopConfirm(_) => Some(ModalKind::StopConfirm),
            _ => None,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        match &self.phase {
            SessionPhase::Idle => None,
            SessionPhase::Selecting(task) => Some(task),
            SessionPhase::Running(run) | SessionPhase::StopConfirm(run) => Some(&run.task),
        }
    }

    pub fn active_run(&self) -> Option<&ActiveRun> {
        match &self.phase {
            SessionPhase::Running(run) | SessionPhase::StopConfirm(run) => Some(run),
            _ => None,
        }
    }

    /// Whether a timer is running (including while the stop dialog is open).
    pub fn is_running(&self) -> bool {
        self.active_run().is_some()
    }

    pub fn timer_snapshot(&self) -> Option<TimerSnapshot> {
        self.active_run()
            .and_then(|run| run.window())
            .filter(|window| !window.is_closed())
            .map(TimerWindow::snapshot)
    }

    /// Forward a command to the open timer window, if it is still alive.
    pub fn send_timer_command(&self, command: TimerCommand) -> bool {
        self.active_run()
            .and_then(|run| run.window())
            .is_some_and(|window| window.send(command))
    }

    pub fn select_task(&mut self, tasks: &[Task], task_id: TaskId) -> Result<(), SessionError> {
        if self.is_running() {
            return Err(SessionError::validation(ALREADY_RUNNING));
        }
        let task = tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| SessionError::validation(format!("Task {task_id} no longer exists")))?;
        self.phase = SessionPhase::Selecting(task.clone());
        Ok(())
    }

    pub fn cancel_selection(&mut self) {
        if matches!(self.phase, SessionPhase::Selecting(_)) {
            self.phase = SessionPhase::Idle;
        }
    }

    /// Confirm the start dialog: validate the task, then open its timer window.
    /// On failure the start dialog stays open.
    pub fn confirm_start(
        &mut self,
        viewport: (u16, u16),
        now: OffsetDateTime,
    ) -> Result<RunId, SessionError> {
        let SessionPhase::Selecting(task) = &self.phase else {
            return Err(SessionError::validation(INVALID_TASK));
        };
        let minutes = match task.positive_duration() {
            Some(minutes) if !task.id.is_unset() => minutes,
            _ => return Err(SessionError::validation(INVALID_TASK)),
        };

        let run = RunId::new(self.next_run);
        let start = TimerStart {
            run,
            task_id: task.id,
            task_name: task.name.clone(),
            duration_minutes: minutes,
            started_at: now,
        };
        let window = TimerWindow::open(
            &timer_location(minutes),
            start,
            viewport,
            &self.settings,
            self.events.clone(),
            self.store.clone(),
        )?;

        self.next_run += 1;
        let SessionPhase::Selecting(task) = mem::take(&mut self.phase) else {
            unreachable!("phase checked above");
        };
        tracing::info!(%run, task = %task.id, minutes, "session started");
        self.phase = SessionPhase::Running(ActiveRun {
            run,
            task,
            started_at: now,
            window: Some(window),
        });
        Ok(run)
    }

    /// Open the stop dialog. Returns `false` when no session is running.
    pub fn request_stop(&mut self) -> bool {
        match mem::take(&mut self.phase) {
            SessionPhase::Running(run) => {
                self.phase = SessionPhase::StopConfirm(run);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Close the stop dialog; the countdown carries on.
    pub fn cancel_stop(&mut self) {
        self.phase = match mem::take(&mut self.phase) {
            SessionPhase::StopConfirm(run) => SessionPhase::Running(run),
            other => other,
        };
    }

    /// End the session early. Yields the `incomplete` record to persist.
    pub fn confirm_stop(&mut self, now: OffsetDateTime) -> Option<NewSession> {
        if !matches!(self.phase, SessionPhase::StopConfirm(_)) {
            return None;
        }
        self.finish(now, SessionStatus::Incomplete)
    }

    /// End whatever is running without asking, e.g. when quitting.
    pub fn abandon(&mut self, now: OffsetDateTime) -> Option<NewSession> {
        self.finish(now, SessionStatus::Incomplete)
    }

    pub fn handle_timer_event(&mut self, event: TimerEvent) -> Option<NewSession> {
        let Some(run) = self.active_run() else {
            tracing::debug!(run = %event.run, "timer event with no active run ignored");
            return None;
        };
        if run.run != event.run {
            tracing::debug!(run = %event.run, "stale timer event ignored");
            return None;
        }

        match event.kind {
            TimerEventKind::Stop { .. } => {
                self.request_stop();
                None
            }
            TimerEventKind::Complete { ended_at, .. } => {
                self.finish(ended_at, SessionStatus::Completed)
            }
            TimerEventKind::Closed => {
                self.on_window_closed();
                None
            }
        }
    }

    /// Liveness check of the timer window; a window that disappeared while the
    /// session runs opens the stop dialog. Returns whether that happened.
    pub fn poll_liveness(&mut self) -> bool {
        let closed = self
            .active_run()
            .and_then(|run| run.window())
            .is_some_and(TimerWindow::is_closed);
        if closed {
            self.on_window_closed()
        } else {
            false
        }
    }

    /// React to a shared store write. A `sessionData` record with a task id is
    /// persisted once: records of a run that already produced one are dropped.
    pub fn handle_store_change(&mut self, change: &StoreChange) -> Option<NewSession> {
        if change.key != SESSION_DATA_KEY {
            return None;
        }
        let raw = change.new_value.as_deref()?;
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding malformed session record: {}", e);
                self.store.remove(SESSION_DATA_KEY);
                return None;
            }
        };
        // Records without a task are not ours; leave them in place.
        let has_task = value
            .get("task_id")
            .is_some_and(|id| !id.is_null() && id.as_i64() != Some(0));
        if !has_task {
            return None;
        }
        self.store.remove(SESSION_DATA_KEY);

        let record: NewSession = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Discarding malformed session record: {}", e);
                return None;
            }
        };
        if record.status == SessionStatus::Unknown {
            tracing::warn!(task = %record.task_id, "Discarding session record with unknown status");
            return None;
        }

        if self
            .finished
            .is_some_and(|(task_id, started_at)| record.same_run(task_id, started_at))
        {
            tracing::debug!(task = %record.task_id, "session record already persisted");
            return None;
        }

        let belongs_to_active = self
            .active_run()
            .is_some_and(|run| record.same_run(run.task.id, run.started_at));
        if belongs_to_active {
            if let SessionPhase::Running(mut run) | SessionPhase::StopConfirm(mut run) =
                mem::take(&mut self.phase)
            {
                run.close_window();
            }
        }

        self.finished = Some((record.task_id, record.start_time));
        Some(record)
    }

    fn on_window_closed(&mut self) -> bool {
        match &mut self.phase {
            SessionPhase::Running(run) => {
                run.window = None;
                tracing::info!(run = %run.run, "timer window closed while running");
                self.request_stop()
            }
            SessionPhase::StopConfirm(run) => {
                run.window = None;
                false
            }
            _ => false,
        }
    }

    fn finish(&mut self, ended_at: OffsetDateTime, status: SessionStatus) -> Option<NewSession> {
        let mut run = match mem::take(&mut self.phase) {
            SessionPhase::Running(run) | SessionPhase::StopConfirm(run) => run,
            other => {
                self.phase = other;
                return None;
            }
        };
        run.close_window();
        tracing::info!(run = %run.run, %status, "session ended");

        let record = run.record(ended_at, status)?;
        self.finished = Some((record.task_id, record.start_time));
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    const VIEWPORT: (u16, u16) = (120, 40);

    fn task(id: i64, duration: Option<i64>) -> Task {
        Task {
            id: TaskId::new(id),
            name: format!("Task {id}"),
            description: None,
            duration,
        }
    }

    fn orchestrator() -> (SessionOrchestrator, mpsc::UnboundedReceiver<TimerEvent>, SharedStore) {
        let store = SharedStore::new();
        let (orchestrator, events) = SessionOrchestrator::new(TimerSettings::default(), store.clone());
        (orchestrator, events, store)
    }

    fn started(orchestrator: &mut SessionOrchestrator, tasks: &[Task]) -> (RunId, OffsetDateTime) {
        let now = OffsetDateTime::now_utc();
        orchestrator.select_task(tasks, tasks[0].id).unwrap();
        let run = orchestrator.confirm_start(VIEWPORT, now).unwrap();
        (run, now)
    }

    #[tokio::test]
    async fn select_then_start_opens_timer_window() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(1, Some(25))];

        orchestrator.select_task(&tasks, TaskId::new(1)).unwrap();
        assert_eq!(orchestrator.modal(), Some(ModalKind::StartConfirm));

        orchestrator
            .confirm_start(VIEWPORT, OffsetDateTime::now_utc())
            .unwrap();
        assert!(matches!(orchestrator.phase(), SessionPhase::Running(_)));
        assert_eq!(orchestrator.modal(), None);

        let run = orchestrator.active_run().unwrap();
        assert!(!run.window().unwrap().is_closed());
        assert_eq!(orchestrator.timer_snapshot().unwrap().remaining_secs, 25 * 60);
    }

    #[tokio::test]
    async fn unknown_task_cannot_be_selected() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let err = orchestrator
            .select_task(&[task(1, Some(5))], TaskId::new(9))
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(matches!(orchestrator.phase(), SessionPhase::Idle));
    }

    #[tokio::test]
    async fn invalid_duration_keeps_start_dialog_open() {
        for duration in [None, Some(0), Some(-3)] {
            let (mut orchestrator, _events, _store) = orchestrator();
            let tasks = vec![task(1, duration)];
            orchestrator.select_task(&tasks, TaskId::new(1)).unwrap();

            let err = orchestrator
                .confirm_start(VIEWPORT, OffsetDateTime::now_utc())
                .unwrap_err();
            assert!(matches!(err, SessionError::Validation(_)));
            assert_eq!(orchestrator.modal(), Some(ModalKind::StartConfirm));
            assert!(!orchestrator.is_running());
        }
    }

    #[tokio::test]
    async fn blocked_window_reverts_to_selecting() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(1, Some(5))];
        orchestrator.select_task(&tasks, TaskId::new(1)).unwrap();

        let err = orchestrator
            .confirm_start((10, 4), OffsetDateTime::now_utc())
            .unwrap_err();
        assert!(matches!(err, SessionError::PopupBlocked(_)));
        assert_eq!(orchestrator.modal(), Some(ModalKind::StartConfirm));
        assert_eq!(orchestrator.selected_task().unwrap().id, TaskId::new(1));
    }

    #[tokio::test]
    async fn cannot_select_while_running() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(1, Some(5)), task(2, Some(5))];
        started(&mut orchestrator, &tasks);

        let err = orchestrator.select_task(&tasks, TaskId::new(2)).unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(orchestrator.selected_task().unwrap().id, TaskId::new(1));
    }

    #[tokio::test]
    async fn completion_produces_one_completed_record() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(4, Some(1))];
        let (run, started_at) = started(&mut orchestrator, &tasks);
        let ended_at = started_at + Duration::minutes(1);

        let complete = TimerEvent {
            run,
            kind: TimerEventKind::Complete {
                task_id: TaskId::new(4),
                started_at,
                ended_at,
            },
        };
        let record = orchestrator.handle_timer_event(complete.clone()).unwrap();
        assert_eq!(record.status, SessionStatus::Completed);
        assert_eq!(record.task_id, TaskId::new(4));
        assert!(record.start_time <= record.end_time);
        assert!(matches!(orchestrator.phase(), SessionPhase::Idle));

        assert_eq!(orchestrator.handle_timer_event(complete), None);
    }

    #[tokio::test]
    async fn confirmed_stop_produces_one_incomplete_record() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(2, Some(10))];
        let (run, _) = started(&mut orchestrator, &tasks);

        assert!(orchestrator.request_stop());
        assert_eq!(orchestrator.modal(), Some(ModalKind::StopConfirm));

        let record = orchestrator
            .confirm_stop(OffsetDateTime::now_utc())
            .unwrap();
        assert_eq!(record.status, SessionStatus::Incomplete);
        assert!(record.start_time <= record.end_time);
        assert!(matches!(orchestrator.phase(), SessionPhase::Idle));

        assert_eq!(orchestrator.confirm_stop(OffsetDateTime::now_utc()), None);
        let late = TimerEvent {
            run,
            kind: TimerEventKind::Complete {
                task_id: TaskId::new(2),
                started_at: record.start_time,
                ended_at: OffsetDateTime::now_utc(),
            },
        };
        assert_eq!(orchestrator.handle_timer_event(late), None);
    }

    #[tokio::test]
    async fn cancelling_stop_keeps_the_run() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(2, Some(10))];
        let (run, started_at) = started(&mut orchestrator, &tasks);

        orchestrator.request_stop();
        orchestrator.cancel_stop();

        let active = orchestrator.active_run().unwrap();
        assert!(matches!(orchestrator.phase(), SessionPhase::Running(_)));
        assert_eq!(active.run, run);
        assert_eq!(active.started_at, started_at);
        assert!(!active.window().unwrap().is_closed());
        assert_eq!(orchestrator.timer_snapshot().unwrap().notice, None);
    }

    #[tokio::test]
    async fn stop_message_from_timer_opens_stop_dialog() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(2, Some(10))];
        let (run, started_at) = started(&mut orchestrator, &tasks);

        let stop = TimerEvent {
            run,
            kind: TimerEventKind::Stop {
                task_id: TaskId::new(2),
                started_at,
            },
        };
        assert_eq!(orchestrator.handle_timer_event(stop), None);
        assert_eq!(orchestrator.modal(), Some(ModalKind::StopConfirm));
    }

    #[tokio::test]
    async fn window_closing_unexpectedly_opens_stop_dialog() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(2, Some(10))];
        started(&mut orchestrator, &tasks);

        assert!(!orchestrator.poll_liveness());
        assert!(orchestrator.send_timer_command(TimerCommand::Close));
        while !orchestrator
            .active_run()
            .and_then(|run| run.window())
            .is_some_and(TimerWindow::is_closed)
        {
            tokio::task::yield_now().await;
        }

        assert!(orchestrator.poll_liveness());
        assert_eq!(orchestrator.modal(), Some(ModalKind::StopConfirm));
        assert!(orchestrator.timer_snapshot().is_none());
    }

    #[tokio::test]
    async fn closed_event_opens_stop_dialog_once() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(2, Some(10))];
        let (run, _) = started(&mut orchestrator, &tasks);

        let closed = TimerEvent {
            run,
            kind: TimerEventKind::Closed,
        };
        orchestrator.handle_timer_event(closed.clone());
        assert_eq!(orchestrator.modal(), Some(ModalKind::StopConfirm));

        orchestrator.handle_timer_event(closed);
        assert_eq!(orchestrator.modal(), Some(ModalKind::StopConfirm));
        assert!(orchestrator.confirm_stop(OffsetDateTime::now_utc()).is_some());
    }

    #[tokio::test]
    async fn events_from_an_older_run_are_ignored() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(2, Some(10))];
        started(&mut orchestrator, &tasks);

        let stale = TimerEvent {
            run: RunId::new(999),
            kind: TimerEventKind::Closed,
        };
        orchestrator.handle_timer_event(stale);
        assert!(matches!(orchestrator.phase(), SessionPhase::Running(_)));
    }

    #[tokio::test]
    async fn store_record_for_active_run_ends_it() {
        let (mut orchestrator, _events, store) = orchestrator();
        let tasks = vec![task(5, Some(10))];
        let (_run, started_at) = started(&mut orchestrator, &tasks);

        let record = NewSession::new(
            TaskId::new(5),
            started_at,
            started_at + Duration::minutes(10),
            SessionStatus::Completed,
        );
        let raw = serde_json::to_string(&record).unwrap();
        store.set(SESSION_DATA_KEY, raw.clone());
        let change = StoreChange {
            key: SESSION_DATA_KEY.to_string(),
            new_value: Some(raw),
        };

        assert_eq!(orchestrator.handle_store_change(&change), Some(record));
        assert!(matches!(orchestrator.phase(), SessionPhase::Idle));
        assert_eq!(store.get(SESSION_DATA_KEY), None);

        // The same record observed again is not persisted twice.
        assert_eq!(orchestrator.handle_store_change(&change), None);
    }

    #[tokio::test]
    async fn store_record_after_completion_is_dropped() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(5, Some(1))];
        let (run, started_at) = started(&mut orchestrator, &tasks);
        let ended_at = started_at + Duration::minutes(1);

        orchestrator
            .handle_timer_event(TimerEvent {
                run,
                kind: TimerEventKind::Complete {
                    task_id: TaskId::new(5),
                    started_at,
                    ended_at,
                },
            })
            .unwrap();

        let duplicate = NewSession::new(TaskId::new(5), started_at, ended_at, SessionStatus::Completed);
        let change = StoreChange {
            key: SESSION_DATA_KEY.to_string(),
            new_value: Some(serde_json::to_string(&duplicate).unwrap()),
        };
        assert_eq!(orchestrator.handle_store_change(&change), None);
    }

    #[tokio::test]
    async fn store_records_without_task_or_for_other_keys_are_ignored() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let now = OffsetDateTime::now_utc();
        let unset = NewSession::new(TaskId::new(0), now, now, SessionStatus::Completed);

        let zero = StoreChange {
            key: SESSION_DATA_KEY.to_string(),
            new_value: Some(serde_json::to_string(&unset).unwrap()),
        };
        assert_eq!(orchestrator.handle_store_change(&zero), None);

        let other = StoreChange {
            key: "theme".to_string(),
            new_value: Some("dark".to_string()),
        };
        assert_eq!(orchestrator.handle_store_change(&other), None);

        let removed = StoreChange {
            key: SESSION_DATA_KEY.to_string(),
            new_value: None,
        };
        assert_eq!(orchestrator.handle_store_change(&removed), None);
    }

    #[tokio::test]
    async fn store_record_missing_task_is_left_in_place() {
        let (mut orchestrator, _events, store) = orchestrator();
        let raw = r#"{"start_time": "2024-05-01T09:00:00Z", "status": "completed"}"#;
        store.set(SESSION_DATA_KEY, raw);

        let change = StoreChange {
            key: SESSION_DATA_KEY.to_string(),
            new_value: Some(raw.to_string()),
        };
        assert_eq!(orchestrator.handle_store_change(&change), None);
        assert_eq!(store.get(SESSION_DATA_KEY).as_deref(), Some(raw));
    }

    #[tokio::test]
    async fn store_record_with_unrecognised_status_is_not_persisted() {
        let (mut orchestrator, _events, store) = orchestrator();
        let raw = r#"{"task_id": 4, "start_time": "2024-05-01T09:00:00Z", "end_time": "2024-05-01T09:25:00Z", "status": "paused"}"#;
        store.set(SESSION_DATA_KEY, raw);

        let change = StoreChange {
            key: SESSION_DATA_KEY.to_string(),
            new_value: Some(raw.to_string()),
        };
        assert_eq!(orchestrator.handle_store_change(&change), None);
        assert_eq!(store.get(SESSION_DATA_KEY), None);
    }

    #[tokio::test]
    async fn abandon_records_incomplete_from_running() {
        let (mut orchestrator, _events, _store) = orchestrator();
        let tasks = vec![task(3, Some(10))];
        started(&mut orchestrator, &tasks);

        let record = orchestrator.abandon(OffsetDateTime::now_utc()).unwrap();
        assert_eq!(record.status, SessionStatus::Incomplete);
        assert!(!orchestrator.is_running());
        assert_eq!(orchestrator.abandon(OffsetDateTime::now_utc()), None);
    }
}
