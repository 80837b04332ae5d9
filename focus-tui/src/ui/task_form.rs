use super::*;
use crate::app::{FormField, TextInput};

/// Three field rows plus borders.
pub const FORM_HEIGHT: u16 = 5;

const FIELDS: [FormField; 3] = [FormField::Name, FormField::Description, FormField::Duration];

pub fn render_task_form(frame: &mut Frame, area: Rect, app: &App) {
    let focused = is_focused(app, Pane::Form);
    let lines: Vec<Line> = FIELDS
        .iter()
        .map(|field| {
            let active = focused && app.form.focused == *field;
            field_line(field.label(), app.form.input(*field), active)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(pane_block(" New Task ", focused));
    frame.render_widget(paragraph, area);
}

fn field_line<'a>(label: &'a str, input: &'a TextInput, active: bool) -> Line<'a> {
    let label_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![Span::styled(format!("{label:<15}"), label_style)];

    if active {
        let (before, after) = input.split_at_cursor();
        let mut rest = after.chars();
        let under_cursor = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
        spans.push(Span::raw(before));
        spans.push(Span::styled(
            under_cursor,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(rest.as_str()));
    } else {
        spans.push(Span::styled(
            input.value.as_str(),
            Style::default().fg(Color::White),
        ));
    }
    Line::from(spans)
}
