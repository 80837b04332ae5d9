use super::utils::centered_rect;
use super::*;
use crate::session::ModalKind;

/// Text of the dialog currently shown, if any.
#[derive(Debug, PartialEq)]
pub(super) struct ModalText {
    pub title: &'static str,
    pub message: String,
    pub confirm: &'static str,
    pub cancel: &'static str,
}

pub(super) fn modal_text(app: &App) -> Option<ModalText> {
    if app.confirm_quit {
        let unsaved = app.pending_sessions.len();
        let mut message = if app.orchestrator.is_running() {
            let name = app
                .orchestrator
                .selected_task()
                .map(|t| t.name.as_str())
                .unwrap_or("this task");
            format!("A session for {name} is running. Quit and record it as incomplete?")
        } else {
            "Quit?".to_string()
        };
        if unsaved > 0 {
            message.push_str(&format!(" {unsaved} unsaved session(s) will be lost."));
        }
        return Some(ModalText {
            title: " Quit? ",
            message,
            confirm: "Quit",
            cancel: "Stay",
        });
    }

    let task = app.orchestrator.selected_task()?;
    match app.modal()? {
        ModalKind::StartConfirm => Some(ModalText {
            title: " Start Session ",
            message: format!(
                "Start session for {} ({})?",
                task.name,
                super::task_list::duration_label(task)
            ),
            confirm: "Start",
            cancel: "Cancel",
        }),
        ModalKind::StopConfirm => Some(ModalText {
            title: " Stop Session ",
            message: format!("Nope! Finish your time for {}.", task.name),
            confirm: "Stop Anyway",
            cancel: "Continue",
        }),
    }
}

pub fn render_modal(frame: &mut Frame, app: &App) {
    let Some(text) = modal_text(app) else {
        return;
    };

    let area = centered_rect(56, 9, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(text.message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("[y] {}", text.confirm),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("    "),
            Span::styled(
                format!("[n] {}", text.cancel),
                Style::default().fg(Color::White),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(text.title)
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
