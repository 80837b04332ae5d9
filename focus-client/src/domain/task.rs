use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::TaskId;

/// A named unit of work with a target focus duration, as returned by `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "task_id")]
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Target duration in minutes. `None` when the backend sent nothing usable.
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub duration: Option<i64>,
}

impl Task {
    /// The duration in minutes, only when it is strictly positive.
    pub fn positive_duration(&self) -> Option<u32> {
        self.duration
            .filter(|minutes| *minutes > 0)
            .and_then(|minutes| u32::try_from(minutes).ok())
    }

    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "No description",
        }
    }
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: u32,
}

impl NewTask {
    /// Cached copy of the task once the backend has assigned it an id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            name: self.name,
            description: self.description,
            duration: Some(i64::from(self.duration)),
        }
    }
}

// Accepts integers, integral floats and numeric strings; anything else becomes None.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}
