use super::utils::format_local;
use super::*;
use focus_client::{Session, SessionStatus};

pub fn render_session_history(frame: &mut Frame, area: Rect, app: &mut App) {
    let focused = is_focused(app, Pane::History);
    let block = pane_block(" Session History ", focused);
    let inner = block.inner(area);
    app.history_view_height = inner.height as usize;

    if app.sessions.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No sessions recorded yet.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines: Vec<Line> = app
        .sessions
        .iter()
        .skip(app.history_scroll)
        .take(inner.height as usize)
        .map(history_line)
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn history_line(session: &Session) -> Line<'static> {
    let row = HistoryRow::from(session);
    let status_color = match session.status {
        SessionStatus::Completed => Color::Green,
        SessionStatus::Incomplete => Color::Red,
        SessionStatus::Unknown => Color::DarkGray,
    };
    Line::from(vec![
        Span::styled(
            format!("{:<20} ", truncate(&row.task_name, 20)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{} → {:<16} ", row.start, row.end),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(row.status, Style::default().fg(status_color)),
    ])
}

/// Display values of one history row.
#[derive(Debug, PartialEq)]
struct HistoryRow {
    task_name: String,
    start: String,
    end: String,
    status: String,
}

impl From<&Session> for HistoryRow {
    fn from(session: &Session) -> Self {
        Self {
            task_name: session
                .task_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Untitled Task".to_string()),
            start: session
                .start_time
                .map(format_local)
                .unwrap_or_else(|| "N/A".to_string()),
            end: session
                .end_time
                .map(format_local)
                .unwrap_or_else(|| "In Progress".to_string()),
            status: session.status.to_string(),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_client::{SessionId, TaskId};

    fn session() -> Session {
        Session {
            id: SessionId::new(1),
            task_id: TaskId::new(2),
            task_name: None,
            start_time: None,
            end_time: None,
            status: SessionStatus::Incomplete,
        }
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let row = HistoryRow::from(&session());
        assert_eq!(row.task_name, "Untitled Task");
        assert_eq!(row.start, "N/A");
        assert_eq!(row.end, "In Progress");
        assert_eq!(row.status, "incomplete");
    }

    #[test]
    fn present_fields_are_shown() {
        let mut session = session();
        session.task_name = Some("Write".to_string());
        session.start_time = Some(time::OffsetDateTime::UNIX_EPOCH);
        session.status = SessionStatus::Completed;

        let row = HistoryRow::from(&session);
        assert_eq!(row.task_name, "Write");
        assert_ne!(row.start, "N/A");
        assert_eq!(row.status, "completed");
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
