//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vantage_core::Dimension;

/// Vantage - CMDB analytics and assistant
#[derive(Parser)]
#[command(name = "vantage")]
#[command(about = "Dashboards and a query assistant for your CMDB", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/vantage/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CMDB backend URL (overrides config and VANTAGE_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Read statistics from a JSON file instead of the backend
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a dashboard view
    Report {
        #[arg(value_enum)]
        view: ReportView,
    },

    /// Show where a chart row leads in the CI list
    Drill {
        /// Dimension: sla, cost-center, software, ci-type, status
        dimension: Dimension,

        /// Row name, e.g. "Gold" or "Windows Server 2012"
        name: String,
    },

    /// Ask the CMDB assistant (interactive unless --query is given)
    Ask {
        /// Ask a single question and exit
        #[arg(short, long)]
        query: Option<String>,

        /// Use canned answers instead of the backend
        #[arg(long)]
        mock: bool,
    },

    /// Show the resolved configuration
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportView {
    /// CIs per SLA tier
    Sla,
    /// Cost per cost center, split by CI type
    Cost,
    /// CI registrations per month
    Growth,
    /// Operating systems and databases with lifecycle status
    OsDb,
    /// Headline counters with type and status breakdowns
    Overview,
}
