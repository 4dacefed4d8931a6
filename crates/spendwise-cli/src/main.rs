//! Spendwise CLI - Expense categorization and AI insights
//!
//! Usage:
//!   spendwise categorize "Coffee" --merchant Starbucks   Categorize one expense
//!   spendwise bulk --file expenses.csv                   Categorize a file of expenses
//!   spendwise insights --file expenses.json              Generate spending insights
//!   spendwise serve --port 3000                          Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

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
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Categorize {
            description,
            merchant,
        } => commands::cmd_categorize(&config, &description, merchant.as_deref()).await,
        Commands::Suggest {
            description,
            merchant,
        } => commands::cmd_suggest(&config, &description, merchant.as_deref()),
        Commands::Bulk { file } => commands::cmd_bulk(&config, &file).await,
        Commands::Insights { file } => commands::cmd_insights(&config, &file).await,
        Commands::Recommend { file, budgets } => {
            commands::cmd_recommend(&config, &file, budgets.as_deref()).await
        }
        Commands::Advice { file } => commands::cmd_advice(&config, &file).await,
        Commands::Ping => commands::cmd_ping(&config).await,
        Commands::Serve { host, port } => commands::cmd_serve(config, &host, port).await,
    }
}
