//! Vantage CLI - CMDB analytics and assistant
//!
//! Usage:
//!   vantage report sla              SLA tier breakdown
//!   vantage report cost --json      Cost view as JSON
//!   vantage drill software "Oracle 11g"
//!   vantage ask                     Interactive assistant
//!   vantage ask --query "how many servers?"

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    match cli.command {
        Commands::Report { view } => {
            let config = commands::load_config(cli.config.as_deref(), cli.backend.as_deref())?;
            let snapshot = commands::load_snapshot(&config, cli.snapshot.as_deref()).await?;
            commands::cmd_report(&snapshot, view, cli.json)
        }
        Commands::Drill { dimension, name } => commands::cmd_drill(dimension, &name, cli.json),
        Commands::Ask { query, mock } => {
            let config = commands::load_config(cli.config.as_deref(), cli.backend.as_deref())?;
            match query {
                Some(query) => commands::cmd_ask_once(&config, &query, mock, cli.json).await,
                None => commands::cmd_ask_interactive(&config, mock).await,
            }
        }
        Commands::Config => {
            let config = commands::load_config(cli.config.as_deref(), cli.backend.as_deref())?;
            commands::cmd_config(&config, cli.json)
        }
    }
}
