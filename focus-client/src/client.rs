use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{Created, NewSession, NewTask, Session, SessionId, Task, TaskId};
use crate::NetworkError;

/// Remote task/session storage.
///
/// Implemented over HTTP by [`ApiClient`]; the terminal client also ships an
/// in-memory implementation for offline demos.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, NetworkError>;

    /// Create a task and return the identifier the backend assigned to it.
    async fn create_task(&self, task: &NewTask) -> Result<TaskId, NetworkError>;

    async fn list_sessions(&self) -> Result<Vec<Session>, NetworkError>;

    async fn create_session(&self, session: &NewSession) -> Result<SessionId, NetworkError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// `base_url` may carry a path prefix (e.g. `https://host/api`); resource paths
    /// are appended to it.
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| NetworkError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder()
            .build()
            .map_err(|e| NetworkError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, NetworkError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| NetworkError::InvalidUrl(format!("Failed to build URL for {path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, NetworkError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("{} failed: {}", call_name, e);
            NetworkError::Request {
                call: call_name.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned {}", call_name, status);
            return Err(NetworkError::Status {
                call: call_name.to_string(),
                status: status.to_string(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, NetworkError> {
        let response = self.send(request, call_name).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| NetworkError::Decode {
                call: call_name.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl TrackerApi for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, NetworkError> {
        self.get_json(self.client.get(self.endpoint("/tasks")?), "GET /tasks")
            .await
    }

    async fn create_task(&self, task: &NewTask) -> Result<TaskId, NetworkError> {
        let created: Created = self
            .get_json(
                self.client.post(self.endpoint("/tasks")?).json(task),
                "POST /tasks",
            )
            .await?;
        tracing::debug!("created task {}", created.id);
        Ok(TaskId::new(created.id))
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, NetworkError> {
        self.get_json(self.client.get(self.endpoint("/sessions")?), "GET /sessions")
            .await
    }

    async fn create_session(&self, session: &NewSession) -> Result<SessionId, NetworkError> {
        let created: Created = self
            .get_json(
                self.client.post(self.endpoint("/sessions")?).json(session),
                "POST /sessions",
            )
            .await?;
        tracing::debug!(
            "created session {} for task {} ({})",
            created.id,
            session.task_id,
            session.status
        );
        Ok(SessionId::new(created.id))
    }
}
