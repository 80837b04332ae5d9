use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use super::{SessionId, TaskId};

/// Outcome of a timed session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Completed,
    Incomplete,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Completed => write!(f, "completed"),
            SessionStatus::Incomplete => write!(f, "incomplete"),
            SessionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A recorded session as returned by `GET /sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub task_id: TaskId,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(default)]
    pub status: SessionStatus,
}

/// Body of `POST /sessions`. Also the JSON shape of the `sessionData` store record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSession {
    pub task_id: TaskId,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
    pub status: SessionStatus,
}

impl NewSession {
    pub fn new(
        task_id: TaskId,
        start_time: OffsetDateTime,
        end_time: OffsetDateTime,
        status: SessionStatus,
    ) -> Self {
        Self {
            task_id,
            start_time,
            // A clock step backwards must not produce end < start.
            end_time: end_time.max(start_time),
            status,
        }
    }

    /// Whether this record describes the same logical run as `other`.
    pub fn same_run(&self, task_id: TaskId, start_time: OffsetDateTime) -> bool {
        self.task_id == task_id && self.start_time == start_time
    }
}
