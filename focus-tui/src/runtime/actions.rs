use crate::app::App;
use focus_client::{NewSession, NewTask, TrackerApi};

use super::action_queue::Action;

pub(super) async fn run_action(action: Action, app: &mut App, api: &dyn TrackerApi) {
    match action {
        Action::CreateTask(task) => handle_create_task(task, app, api).await,
        Action::PersistSession(record) => handle_persist_session(record, app, api).await,
        Action::RetryPendingSessions => retry_pending_sessions(app, api).await,
        Action::ReloadAll => reload_all(app, api).await,
        Action::RefreshSessionsBackground => refresh_sessions_background(app, api).await,
    }
}

/// Create, then re-fetch so the list shows what the backend stored.
async fn handle_create_task(task: NewTask, app: &mut App, api: &dyn TrackerApi) {
    let id = match api.create_task(&task).await {
        Ok(id) => id,
        Err(e) => {
            app.notices.error(format!("Error creating task: {}", e));
            return;
        }
    };
    tracing::info!(task = %id, name = %task.name, "task created");

    match api.list_tasks().await {
        Ok(tasks) => app.set_tasks(tasks),
        Err(e) => {
            tracing::warn!("Task list refresh failed after create: {}", e);
            app.append_task(task.clone().into_task(id));
        }
    }
    app.notices.success(format!("Task '{}' created", task.name));
}

async fn handle_persist_session(record: NewSession, app: &mut App, api: &dyn TrackerApi) {
    match api.create_session(&record).await {
        Ok(id) => {
            tracing::info!(session = id.as_i64(), task = %record.task_id, status = %record.status, "session saved");
            app.notices
                .success(format!("Session saved as {}", record.status));
            refresh_sessions(app, api).await;
        }
        Err(e) => {
            app.hold_pending(record);
            app.notices.error(format!(
                "Could not save session: {}. Press r to retry or d to dismiss",
                e
            ));
        }
    }
}

async fn retry_pending_sessions(app: &mut App, api: &dyn TrackerApi) {
    if app.pending_sessions.is_empty() {
        app.notices.info("No unsaved sessions");
        return;
    }

    let pending = std::mem::take(&mut app.pending_sessions);
    let total = pending.len();
    let mut last_error = None;
    for record in pending {
        if let Err(e) = api.create_session(&record).await {
            last_error = Some(e);
            app.hold_pending(record);
        }
    }

    match last_error {
        None => {
            app.notices.success(format!("Saved {total} pending session(s)"));
            refresh_sessions(app, api).await;
        }
        Some(e) => {
            let saved = total - app.pending_sessions.len();
            if saved > 0 {
                refresh_sessions(app, api).await;
            }
            app.notices.error(format!(
                "{} of {} session(s) still unsaved: {}",
                app.pending_sessions.len(),
                total,
                e
            ));
        }
    }
}

pub(crate) async fn reload_all(app: &mut App, api: &dyn TrackerApi) {
    match api.list_tasks().await {
        Ok(tasks) => app.set_tasks(tasks),
        Err(e) => app.notices.error(format!("Could not load tasks: {}", e)),
    }
    refresh_sessions(app, api).await;
}

async fn refresh_sessions(app: &mut App, api: &dyn TrackerApi) {
    match api.list_sessions().await {
        Ok(sessions) => app.set_sessions(sessions),
        Err(e) => app.notices.error(format!("Could not load sessions: {}", e)),
    }
}

/// Periodic refresh; failures are logged only.
async fn refresh_sessions_background(app: &mut App, api: &dyn TrackerApi) {
    match api.list_sessions().await {
        Ok(sessions) => app.set_sessions(sessions),
        Err(e) => tracing::warn!("Background session refresh failed: {}", e),
    }
}
