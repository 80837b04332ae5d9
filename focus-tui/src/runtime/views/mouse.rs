use crate::app::{App, Pane};
use crate::session::{TimerCommand, PANEL_HEIGHT, PANEL_WIDTH};
use crate::ui::timer_panel::{hit_test, PanelHit};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Mouse input only reaches the timer panel: its controls and dragging.
pub(in crate::runtime) fn handle_mouse(event: MouseEvent, app: &mut App) {
    if app.confirm_quit || app.modal().is_some() {
        return;
    }
    let Some(area) = app.timer_panel_area else {
        return;
    };
    let dragging = app
        .orchestrator
        .timer_snapshot()
        .is_some_and(|snapshot| snapshot.dragging);

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(hit) = hit_test(area, event.column, event.row) else {
                return;
            };
            app.focused_pane = Pane::Timer;
            let command = match hit {
                PanelHit::Close => TimerCommand::CloseRequested,
                PanelHit::Stop => TimerCommand::StopPressed,
                PanelHit::Body => TimerCommand::DragStart {
                    column: event.column,
                    row: event.row,
                },
            };
            app.send_timer_command(command);
        }
        MouseEventKind::Drag(MouseButton::Left) if dragging => {
            let (width, height) = app.viewport;
            app.send_timer_command(TimerCommand::DragMove {
                column: event.column,
                row: event.row,
                max_x: width.saturating_sub(PANEL_WIDTH),
                max_y: height.saturating_sub(PANEL_HEIGHT),
            });
        }
        MouseEventKind::Up(MouseButton::Left) if dragging => {
            app.send_timer_command(TimerCommand::DragEnd);
        }
        _ => {}
    }
}
