use super::*;
use crate::app::NoticeLevel;
use crate::session::{format_clock, ModalKind};
use time::OffsetDateTime;

pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let mut title = vec![Span::styled(
        " Focus Tracker",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    if !app.pending_sessions.is_empty() {
        title.push(Span::styled(
            format!("   {} unsaved session(s)", app.pending_sessions.len()),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(title)), rows[0]);

    frame.render_widget(
        Paragraph::new(running_bar(app, OffsetDateTime::now_utc())),
        rows[1],
    );
}

fn running_bar(app: &App, now: OffsetDateTime) -> Line<'static> {
    let muted = Style::default().fg(Color::DarkGray);
    let Some(run) = app.orchestrator.active_run() else {
        return Line::from(Span::styled(" No session running", muted));
    };

    let elapsed = (now - run.started_at).whole_seconds().max(0) as u64;
    let mut spans = vec![
        Span::styled(" ● ", Style::default().fg(Color::Green)),
        Span::styled(
            run.task.name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  elapsed {}", format_clock(elapsed)), muted),
    ];
    match app.orchestrator.timer_snapshot() {
        Some(snapshot) => spans.push(Span::styled(
            format!(
                "  remaining {} / {}",
                snapshot.clock(),
                format_clock(snapshot.total_secs)
            ),
            Style::default().fg(Color::Cyan),
        )),
        None => spans.push(Span::styled(
            "  timer window closed",
            Style::default().fg(Color::Red),
        )),
    }
    Line::from(spans)
}

pub fn render_notices(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.notices.latest() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {}", notice.message),
                Style::default().fg(color),
            ))
        }
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub fn render_controls(frame: &mut Frame, area: Rect, app: &App) {
    let hints: &[(&str, &str)] = if app.confirm_quit || app.modal().is_some() {
        match app.modal() {
            Some(ModalKind::StopConfirm) if !app.confirm_quit => {
                &[("y", "Stop anyway"), ("n/Esc", "Continue")]
            }
            _ => &[("y/Enter", "Confirm"), ("n/Esc", "Cancel")],
        }
    } else {
        match app.focused_pane {
            Pane::Form => &[
                ("↑↓", "Field"),
                ("Enter", "Add task"),
                ("Esc", "Leave form"),
                ("Tab", "Next pane"),
            ],
            Pane::Tasks => &[
                ("↑↓", "Move"),
                ("Enter", "Start"),
                ("n", "New task"),
                ("s", "Stop"),
                ("r", "Retry"),
                ("q", "Quit"),
            ],
            Pane::History => &[("↑↓", "Scroll"), ("Tab", "Next pane"), ("q", "Quit")],
            Pane::Timer => &[
                ("Enter/s", "Timer stop"),
                ("x", "Close timer"),
                ("drag", "Move"),
                ("Tab", "Next pane"),
            ],
        }
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            format!(": {label} "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
