mod api;
mod app;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod runtime;
mod session;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use focus_client::TrackerApi;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.command {
        cli::Commands::Run { api_url } => {
            let mut cfg = config::FocusConfig::load()?;
            if let Some(url) = api_url {
                cfg.api_url = url;
            }
            logging::init(&config::FocusConfig::log_path()?)?;
            let client = api::ApiClient::new(&cfg.api_url)
                .with_context(|| format!("Invalid api_url {:?}", cfg.api_url))?;
            tracing::info!(api_url = %client.base_url(), "starting");
            run(&client, &cfg).await
        }
        cli::Commands::Dev => {
            let cfg = config::FocusConfig::load()?;
            logging::init(&config::FocusConfig::log_path()?)?;
            tracing::info!("starting in dev mode");
            let backend = api::DevBackend::new();
            run(&backend, &cfg).await
        }
        cli::Commands::ConfigPath => {
            let path = config::FocusConfig::config_path()?;
            if !path.exists() {
                config::FocusConfig::default().save()?;
            }
            println!("{}", path.display());
            Ok(())
        }
    }
}

async fn run(api: &dyn TrackerApi, cfg: &config::FocusConfig) -> Result<()> {
    let mut app = App::new(cfg);
    bootstrap::initialize_app_state(&mut app, api).await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = runtime::run_app(&mut terminal, &mut app, api, cfg).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("exited with error: {:#}", e);
    }
    result
}
