//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendwise - Categorize expenses and get spending insights
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Expense categorization and AI spending insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform data dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Categorize a single expense
    Categorize {
        /// Expense description
        description: String,

        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
    },

    /// Suggest up to three categories using local keyword rules
    Suggest {
        /// Expense description
        description: String,

        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
    },

    /// Categorize every expense in a file with one service request
    Bulk {
        /// Expense file (JSON array or CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate spending insights
    Insights {
        /// Expense file (JSON array or CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate budget recommendations
    Recommend {
        /// Expense file (JSON array or CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Budget file (JSON array or CSV with category,amount,spent,period)
        #[arg(short, long)]
        budgets: Option<PathBuf>,
    },

    /// Generate spending advice from category totals and daily trends
    Advice {
        /// Expense file (JSON array or CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Check categorization service and AI backend connectivity
    Ping,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
