//! CLI interface for tradepulse
//!
//! Provides subcommands for:
//! - `run`: Start the ingestion pipeline and API server
//! - `news`: Run the news headline simulator
//! - `status`: Show current state
//! - `config`: Show configuration

mod news;
mod run;

pub use news::NewsArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tradepulse")]
#[command(about = "Real-time market-data anomaly detection and streaming server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the ingestion pipeline and API server
    Run(RunArgs),
    /// Run the news headline simulator
    News(NewsArgs),
    /// Show current state
    Status,
    /// Show configuration
    Config,
}
