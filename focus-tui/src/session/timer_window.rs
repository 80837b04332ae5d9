use focus_client::{NewSession, SessionStatus};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use super::error::SessionError;
use super::launch::countdown_seconds;
use super::messages::{RunId, TimerCommand, TimerEvent, TimerEventKind, TimerSnapshot, TimerStart};
use super::store::{SharedStore, SESSION_DATA_KEY};
use crate::config::FocusConfig;

/// Outer size of the timer panel; a viewport smaller than this cannot host it.
pub const PANEL_WIDTH: u16 = 30;
pub const PANEL_HEIGHT: u16 = 11;

const TICK: Duration = Duration::from_secs(1);
const EARLY_STOP_WARNING: &str = "You cannot stop before time ends!";
const ENDED_NOTICE: &str = "Timer ended.";

#[derive(Debug, Clone)]
pub struct TimerSettings {
    pub alert_interval: Duration,
    pub default_minutes: u32,
}

impl TimerSettings {
    pub fn from_config(config: &FocusConfig) -> Self {
        Self {
            alert_interval: config.alert_interval(),
            default_minutes: config.default_duration_minutes,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::from_config(&FocusConfig::default())
    }
}

/// Opener-side handle to a running timer window.
///
/// Dropping the handle ends the window.
#[derive(Debug)]
pub struct TimerWindow {
    commands: mpsc::UnboundedSender<TimerCommand>,
    snapshot: watch::Receiver<TimerSnapshot>,
    handle: JoinHandle<()>,
}

impl TimerWindow {
    /// Open a timer window at `location` inside a viewport of `viewport` cells.
    pub fn open(
        location: &str,
        start: TimerStart,
        viewport: (u16, u16),
        settings: &TimerSettings,
        events: mpsc::UnboundedSender<TimerEvent>,
        store: SharedStore,
    ) -> Result<Self, SessionError> {
        let (width, height) = viewport;
        if width < PANEL_WIDTH || height < PANEL_HEIGHT {
            tracing::warn!(width, height, "timer window blocked by viewport size");
            return Err(SessionError::PopupBlocked(format!(
                "Timer window blocked: the terminal is {width}x{height} but the timer needs \
                 {PANEL_WIDTH}x{PANEL_HEIGHT}. Enlarge it and try again."
            )));
        }

        let total_secs = countdown_seconds(location, settings.default_minutes);
        let run = start.run;
        let started_at = start.started_at_iso();
        let task_minutes = start.duration_minutes;
        let context = TimerContext {
            position: (
                (width - PANEL_WIDTH).saturating_sub(1),
                (height - PANEL_HEIGHT).min(1),
            ),
            total_secs,
            remaining_secs: total_secs,
            grab: None,
            notice: None,
            alert_seq: 0,
            stopped: false,
            alert_interval: settings.alert_interval,
            start,
            events,
            store,
        };

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot) = watch::channel(context.snapshot());
        let handle = tokio::spawn(context.run(command_rx, snapshot_tx));

        tracing::info!(%run, location, total_secs, task_minutes, %started_at, "opened timer window");
        Ok(Self {
            commands,
            snapshot,
            handle,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Deliver a command. Returns `false` when the window is already gone.
    pub fn send(&self, command: TimerCommand) -> bool {
        !self.is_closed() && self.commands.send(command).is_ok()
    }

    pub fn close(self) {
        let _ = self.commands.send(TimerCommand::Close);
    }
}

struct TimerContext {
    start: TimerStart,
    total_secs: u64,
    remaining_secs: u64,
    position: (u16, u16),
    /// Pointer offset inside the panel while dragging.
    grab: Option<(u16, u16)>,
    notice: Option<String>,
    alert_seq: u64,
    stopped: bool,
    alert_interval: Duration,
    events: mpsc::UnboundedSender<TimerEvent>,
    store: SharedStore,
}

impl TimerContext {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<TimerCommand>,
        snapshots: watch::Sender<TimerSnapshot>,
    ) {
        let _closed = ClosedNotice {
            run: self.start.run,
            events: self.events.clone(),
        };

        let now = Instant::now();
        let mut tick = interval_at(now + TICK, TICK);
        let mut alert = interval_at(now + self.alert_interval, self.alert_interval);

        loop {
            tokio::select! {
                _ = tick.tick(), if self.counting() => self.on_tick(),
                _ = alert.tick(), if self.counting() => self.raise_alert(),
                command = commands.recv() => match command {
                    Some(TimerCommand::Close) | None => break,
                    Some(command) => self.on_command(command),
                },
            }
            snapshots.send_replace(self.snapshot());
        }

        tracing::debug!(run = %self.start.run, remaining = self.remaining_secs, "timer window closing");
    }

    fn counting(&self) -> bool {
        self.remaining_secs > 0 && !self.stopped
    }

    fn on_tick(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        let ended_at = OffsetDateTime::now_utc();
        tracing::info!(run = %self.start.run, task = %self.start.task_id, "countdown finished");

        let _ = self.events.send(TimerEvent {
            run: self.start.run,
            kind: TimerEventKind::Complete {
                task_id: self.start.task_id,
                started_at: self.start.started_at,
                ended_at,
            },
        });

        let record = NewSession::new(
            self.start.task_id,
            self.start.started_at,
            ended_at,
            SessionStatus::Completed,
        );
        match serde_json::to_string(&record) {
            Ok(json) => self.store.set(SESSION_DATA_KEY, json),
            Err(e) => tracing::error!("Failed to encode session record: {}", e),
        }
    }

    fn raise_alert(&mut self) {
        self.alert_seq += 1;
    }

    fn on_command(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::StopPressed => {
                if self.remaining_secs > 0 {
                    self.raise_alert();
                    self.notice = Some(EARLY_STOP_WARNING.to_string());
                } else {
                    self.stopped = true;
                    self.notice = Some(ENDED_NOTICE.to_string());
                }
            }
            TimerCommand::CloseRequested => {
                if self.remaining_secs > 0 {
                    let _ = self.events.send(TimerEvent {
                        run: self.start.run,
                        kind: TimerEventKind::Stop {
                            task_id: self.start.task_id,
                            started_at: self.start.started_at,
                        },
                    });
                }
            }
            TimerCommand::DragStart { column, row } => {
                self.grab = Some((
                    column.saturating_sub(self.position.0),
                    row.saturating_sub(self.position.1),
                ));
            }
            TimerCommand::DragMove {
                column,
                row,
                max_x,
                max_y,
            } => {
                if let Some((dx, dy)) = self.grab {
                    self.position = (
                        column.saturating_sub(dx).min(max_x),
                        row.saturating_sub(dy).min(max_y),
                    );
                }
            }
            TimerCommand::DragEnd => self.grab = None,
            TimerCommand::Close => {}
        }
    }

    fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            task_name: self.start.task_name.clone(),
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            position: self.position,
            dragging: self.grab.is_some(),
            notice: self.notice.clone(),
            alert_seq: self.alert_seq,
            stopped: self.stopped,
        }
    }
}

/// Emits `Closed` when the context ends, including by panic.
struct ClosedNotice {
    run: RunId,
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl Drop for ClosedNotice {
    fn drop(&mut self) {
        let _ = self.events.send(TimerEvent {
            run: self.run,
            kind: TimerEventKind::Closed,
        });
    }
}
