use async_trait::async_trait;
use focus_client::{
    NetworkError, NewSession, NewTask, Session, SessionId, SessionStatus, Task, TaskId,
    TrackerApi,
};
use std::sync::{Arc, Mutex};
use time::{Duration, OffsetDateTime};

/// In-memory task API used by `focus-tui dev`.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug)]
struct DevStore {
    tasks: Vec<Task>,
    sessions: Vec<Session>,
    next_task_id: i64,
    next_session_id: i64,
}

impl DevBackend {
    pub fn new() -> Self {
        let tasks = seed_dev_tasks();
        let sessions = seed_dev_sessions(&tasks, OffsetDateTime::now_utc());
        Self {
            store: Arc::new(Mutex::new(DevStore {
                next_task_id: tasks.len() as i64 + 1,
                next_session_id: sessions.len() as i64 + 1,
                tasks,
                sessions,
            })),
        }
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            store: Arc::new(Mutex::new(DevStore {
                tasks: Vec::new(),
                sessions: Vec::new(),
                next_task_id: 1,
                next_session_id: 1,
            })),
        }
    }
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrackerApi for DevBackend {
    async fn list_tasks(&self) -> Result<Vec<Task>, NetworkError> {
        Ok(self.store.lock().expect("dev store lock poisoned").tasks.clone())
    }

    async fn create_task(&self, task: &NewTask) -> Result<TaskId, NetworkError> {
        let mut store = self.store.lock().expect("dev store lock poisoned");
        let id = TaskId::new(store.next_task_id);
        store.next_task_id += 1;
        store.tasks.push(task.clone().into_task(id));
        Ok(id)
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, NetworkError> {
        Ok(self
            .store
            .lock()
            .expect("dev store lock poisoned")
            .sessions
            .clone())
    }

    async fn create_session(&self, session: &NewSession) -> Result<SessionId, NetworkError> {
        let mut store = self.store.lock().expect("dev store lock poisoned");
        let id = SessionId::new(store.next_session_id);
        store.next_session_id += 1;
        let task_name = store
            .tasks
            .iter()
            .find(|t| t.id == session.task_id)
            .map(|t| t.name.clone());
        store.sessions.push(Session {
            id,
            task_id: session.task_id,
            task_name,
            start_time: Some(session.start_time),
            end_time: Some(session.end_time),
            status: session.status,
        });
        Ok(id)
    }
}

fn seed_dev_tasks() -> Vec<Task> {
    [
        ("Write chapter draft", Some("Outline and first pass"), 25),
        ("Inbox zero", None, 10),
        ("Code review", Some("Open pull requests"), 15),
        ("Stretch break", None, 5),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, description, duration), id)| Task {
        id: TaskId::new(id),
        name: name.to_string(),
        description: description.map(str::to_string),
        duration: Some(duration),
    })
    .collect()
}

fn seed_dev_sessions(tasks: &[Task], now: OffsetDateTime) -> Vec<Session> {
    let mut sessions = Vec::new();
    for (i, task) in tasks.iter().take(3).enumerate() {
        let start = now - Duration::hours(i as i64 + 2);
        let minutes = task.duration.unwrap_or(5);
        let (end, status) = if i % 2 == 0 {
            (start + Duration::minutes(minutes), SessionStatus::Completed)
        } else {
            (start + Duration::minutes(minutes / 2), SessionStatus::Incomplete)
        };
        sessions.push(Session {
            id: SessionId::new(i as i64 + 1),
            task_id: task.id,
            task_name: Some(task.name.clone()),
            start_time: Some(start),
            end_time: Some(end),
            status,
        });
    }
    sessions
}
