use crate::app::App;
use focus_client::TrackerApi;

/// Initial load of tasks and session history. Failures are shown as notices;
/// the app starts regardless.
pub async fn initialize_app_state(app: &mut App, api: &dyn TrackerApi) {
    match api.list_tasks().await {
        Ok(tasks) => {
            tracing::info!(count = tasks.len(), "loaded tasks");
            app.set_tasks(tasks);
        }
        Err(e) => app.notices.error(format!("Could not load tasks: {}", e)),
    }

    match api.list_sessions().await {
        Ok(sessions) => {
            tracing::info!(count = sessions.len(), "loaded sessions");
            app.set_sessions(sessions);
        }
        Err(e) => app.notices.error(format!("Could not load sessions: {}", e)),
    }
}
