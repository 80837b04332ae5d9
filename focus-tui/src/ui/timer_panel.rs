use super::*;
use crate::session::{format_clock, TimerSnapshot, PANEL_HEIGHT, PANEL_WIDTH};

/// Height of the large digit block.
const DIGIT_ROWS: usize = 5;
const DIGIT_COLS: usize = 3;
const CLOSE_LABEL: &str = "[x]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelHit {
    Close,
    Stop,
    Body,
}

/// Where the panel lands for a requested origin, kept inside `bounds`.
pub fn panel_area(position: (u16, u16), bounds: Rect) -> Rect {
    let width = PANEL_WIDTH.min(bounds.width);
    let height = PANEL_HEIGHT.min(bounds.height);
    let x = position.0.min(bounds.width.saturating_sub(width));
    let y = position.1.min(bounds.height.saturating_sub(height));
    Rect::new(bounds.x + x, bounds.y + y, width, height)
}

/// Which part of the panel at `area` a click lands on.
pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<PanelHit> {
    if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
        return None;
    }
    let close_start = area.right().saturating_sub(CLOSE_LABEL.len() as u16 + 1);
    if row == area.y && column >= close_start && column < area.right().saturating_sub(1) {
        return Some(PanelHit::Close);
    }
    // The Stop control is the last row inside the border.
    if row == area.bottom().saturating_sub(2) {
        return Some(PanelHit::Stop);
    }
    Some(PanelHit::Body)
}

/// Draw the open timer window, if any. Returns where it was drawn.
pub fn render_timer_panel(frame: &mut Frame, app: &App) -> Option<Rect> {
    let snapshot = app.orchestrator.timer_snapshot()?;
    let area = panel_area(snapshot.position, frame.area());
    frame.render_widget(Clear, area);

    let border = if snapshot.dragging {
        Style::default().fg(Color::Cyan)
    } else if is_focused(app, Pane::Timer) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Line::from(" Focus Timer "))
        .title(Line::from(CLOSE_LABEL).alignment(Alignment::Right));

    let paragraph = Paragraph::new(panel_lines(&snapshot))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
    Some(area)
}

fn panel_lines(snapshot: &TimerSnapshot) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            snapshot.task_name.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let clock_style = if snapshot.remaining_secs == 0 {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    lines.extend(
        large_clock(&format_clock(snapshot.remaining_secs))
            .into_iter()
            .map(|row| Line::from(Span::styled(row, clock_style))),
    );

    let notice = match snapshot.notice.as_deref() {
        Some(text) if snapshot.stopped => {
            Span::styled(text.to_string(), Style::default().fg(Color::Green))
        }
        Some(text) => Span::styled(text.to_string(), Style::default().fg(Color::Red)),
        None => Span::raw(""),
    };
    lines.push(Line::from(notice));
    lines.push(Line::from(Span::styled(
        "[ Stop ]",
        Style::default().fg(Color::Yellow),
    )));
    lines
}

/// Render `mm:ss` in 3x5 block digits.
fn large_clock(text: &str) -> Vec<String> {
    let mut rows = vec![String::new(); DIGIT_ROWS];
    for ch in text.chars() {
        if ch == ':' {
            for (i, row) in rows.iter_mut().enumerate() {
                row.push_str(if i == 1 || i == 3 { " █ " } else { "   " });
            }
        } else if let Some(pattern) = digit_pattern(ch) {
            for (r, row) in rows.iter_mut().enumerate() {
                for c in 0..DIGIT_COLS {
                    row.push(if pattern[r * DIGIT_COLS + c] == 1 { '█' } else { ' ' });
                }
                row.push(' ');
            }
        }
    }
    for row in &mut rows {
        // Drop the trailing gap so the block centers evenly.
        if row.ends_with(' ') {
            row.pop();
        }
    }
    rows
}

fn digit_pattern(ch: char) -> Option<[u8; DIGIT_ROWS * DIGIT_COLS]> {
    let pattern = match ch {
        '0' => [1, 1, 1, 1, 0, 1, 1, 0, 1, 1, 0, 1, 1, 1, 1],
        '1' => [0, 1, 0, 1, 1, 0, 0, 1, 0, 0, 1, 0, 1, 1, 1],
        '2' => [1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1],
        '3' => [1, 1, 1, 0, 0, 1, 0, 1, 1, 0, 0, 1, 1, 1, 1],
        '4' => [1, 0, 1, 1, 0, 1, 1, 1, 1, 0, 0, 1, 0, 0, 1],
        '5' => [1, 1, 1, 1, 0, 0, 1, 1, 1, 0, 0, 1, 1, 1, 1],
        '6' => [1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 0, 1, 1, 1, 1],
        '7' => [1, 1, 1, 0, 0, 1, 0, 1, 0, 0, 1, 0, 0, 1, 0],
        '8' => [1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1],
        '9' => [1, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1],
        _ => return None,
    };
    Some(pattern)
}
