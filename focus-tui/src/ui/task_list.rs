use super::*;
use focus_client::Task;

pub fn render_task_list(frame: &mut Frame, area: Rect, app: &App) {
    let focused = is_focused(app, Pane::Tasks);
    let block = pane_block(" Tasks ", focused);

    if app.tasks.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No tasks available.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let running_task = app.orchestrator.active_run().map(|run| run.task.id);
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .map(|task| {
            let marker = if running_task == Some(task.id) { "● " } else { "" };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(
                        task.name.as_str(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", duration_label(task)),
                        Style::default().fg(Color::Cyan),
                    ),
                ]),
                Line::from(Span::styled(
                    task.description_or_default(),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let highlight = if focused {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(block)
        .highlight_style(highlight)
        .highlight_symbol("▸ ");
    let mut state = ListState::default();
    state.select(Some(app.task_index));
    frame.render_stateful_widget(list, area, &mut state);
}

pub(super) fn duration_label(task: &Task) -> String {
    match task.duration {
        Some(minutes) => format!("{minutes} minutes"),
        None => "no duration".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_client::TaskId;

    #[test]
    fn duration_is_shown_in_minutes() {
        let mut task = Task {
            id: TaskId::new(1),
            name: "Read".to_string(),
            description: None,
            duration: Some(25),
        };
        assert_eq!(duration_label(&task), "25 minutes");
        task.duration = None;
        assert_eq!(duration_label(&task), "no duration");
    }
}
