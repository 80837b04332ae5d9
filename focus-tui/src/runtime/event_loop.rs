use crate::app::App;
use crate::config::FocusConfig;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use focus_client::TrackerApi;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Write};
use std::time::{Duration, Instant};

use super::action_queue::{channel, Action, ActionTx};
use super::actions::run_action;
use super::views::{handle_key, handle_mouse};

const INPUT_POLL: Duration = Duration::from_millis(100);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    api: &dyn TrackerApi,
    cfg: &FocusConfig,
) -> Result<()> {
    let liveness_interval = cfg.liveness_poll_interval();
    let history_interval = cfg.history_refresh_interval();
    let mut last_liveness_check = Instant::now();
    let mut last_history_refresh = Instant::now();

    let (action_tx, mut action_rx) = channel();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(key, app, &action_tx)
                }
                Event::Mouse(mouse) => handle_mouse(mouse, app),
                Event::Resize(width, height) => app.viewport = (width, height),
                _ => {}
            }
        }

        // Timer windows report through both channels; the orchestrator dedupes.
        let records = app
            .drain_timer_events()
            .into_iter()
            .chain(app.drain_store_changes());
        enqueue_records(&action_tx, records);

        if app.orchestrator.is_running() && last_liveness_check.elapsed() >= liveness_interval {
            app.poll_liveness();
            last_liveness_check = Instant::now();
        }

        if app.take_alert() {
            ring_bell(terminal)?;
        }

        if last_history_refresh.elapsed() >= history_interval {
            let _ = action_tx.send(Action::RefreshSessionsBackground);
            last_history_refresh = Instant::now();
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, api).await;
        }

        if app.settle_quit() {
            break;
        }
    }

    Ok(())
}

fn enqueue_records(action_tx: &ActionTx, records: impl Iterator<Item = focus_client::NewSession>) {
    for record in records {
        let _ = action_tx.send(Action::PersistSession(record));
    }
}

fn ring_bell(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let backend = terminal.backend_mut();
    backend.write_all(b"\x07")?;
    Write::flush(backend)?;
    Ok(())
}
