//! Cloud Cost Optimizer CLI
//!
//! A command-line tool for running rightsizing analysis over exported
//! utilization data and scanning cost series for spend anomalies.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{analyze, anomalies};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Cloud Cost Optimizer CLI
#[derive(Parser)]
#[command(name = "cco")]
#[command(author, version, about = "CLI for the Cloud Cost Optimizer", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze utilization exports and produce an optimization report
    Analyze(analyze::AnalyzeArgs),

    /// Scan a cost series for spend anomalies
    Anomalies(anomalies::AnomaliesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer())
        .init();

    match cli.command {
        Commands::Analyze(args) => analyze::run(args, cli.format).await?,
        Commands::Anomalies(args) => anomalies::run(args, cli.format)?,
    }

    Ok(())
}
