use crate::app::{App, Pane};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

mod modal;
mod session_history;
mod status;
mod task_form;
mod task_list;
pub mod timer_panel;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    app.viewport = (area.width, area.height);

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header + running bar
            Constraint::Min(0),    // body
            Constraint::Length(1), // notices
            Constraint::Length(1), // controls
        ])
        .split(area);

    status::render_header(frame, root[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(root[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(task_form::FORM_HEIGHT),
            Constraint::Min(0),
        ])
        .split(columns[0]);

    task_form::render_task_form(frame, left[0], app);
    task_list::render_task_list(frame, left[1], app);
    session_history::render_session_history(frame, columns[1], app);
    status::render_notices(frame, root[2], app);
    status::render_controls(frame, root[3], app);

    app.timer_panel_area = timer_panel::render_timer_panel(frame, app);
    modal::render_modal(frame, app);
}

/// Bordered block whose border lights up when its pane has focus.
fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1))
}

fn is_focused(app: &App, pane: Pane) -> bool {
    app.focused_pane == pane && app.modal().is_none() && !app.confirm_quit
}
