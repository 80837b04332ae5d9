use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "focus-tui")]
#[command(about = "Terminal focus timer that records sessions against a task API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the configured task API
    Run {
        /// Override the API base URL from the config file
        #[arg(long)]
        api_url: Option<String>,
    },
    /// Run in dev mode with local in-memory data
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
}
