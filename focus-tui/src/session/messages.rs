use focus_client::TaskId;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Identifies one logical run of the session lifecycle. Every message a timer
/// window emits carries the run it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Handed to a timer window when it is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerStart {
    pub run: RunId,
    pub task_id: TaskId,
    pub task_name: String,
    /// Display only; the countdown length comes from the window location.
    pub duration_minutes: u32,
    pub started_at: OffsetDateTime,
}

impl TimerStart {
    pub fn started_at_iso(&self) -> String {
        self.started_at
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.started_at.to_string())
    }
}

/// Opener → timer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// The window's own Stop control.
    StopPressed,
    /// The window's close control; asks the opener to stop the session.
    CloseRequested,
    DragStart { column: u16, row: u16 },
    /// `max_x`/`max_y` bound the panel origin to the visible area.
    DragMove {
        column: u16,
        row: u16,
        max_x: u16,
        max_y: u16,
    },
    DragEnd,
    Close,
}

/// Timer window → opener.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEvent {
    pub run: RunId,
    pub kind: TimerEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEventKind {
    /// The user asked to end the session early.
    Stop {
        task_id: TaskId,
        started_at: OffsetDateTime,
    },
    /// The countdown reached zero.
    Complete {
        task_id: TaskId,
        started_at: OffsetDateTime,
        ended_at: OffsetDateTime,
    },
    /// The window's context ended, for whatever reason.
    Closed,
}

/// What a timer window currently shows; published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub task_name: String,
    pub total_secs: u64,
    pub remaining_secs: u64,
    pub position: (u16, u16),
    pub dragging: bool,
    pub notice: Option<String>,
    /// Bumped each time the window plays its alert and asks for focus.
    pub alert_seq: u64,
    pub stopped: bool,
}

impl TimerSnapshot {
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// `mm:ss`, minutes unbounded.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
