//! Zenthra CLI - report runner for the analytics engine.
//!
//! # Usage
//!
//! ```bash
//! # Product sales summary, optionally date-windowed
//! zenthra-cli report products --start 2024-01-01 --end 2024-01-31
//!
//! # Paid-customer analytics
//! zenthra-cli report customers
//!
//! # Abandoned-cart analytics
//! zenthra-cli report abandoned
//!
//! # Dashboard headline metrics
//! zenthra-cli report dashboard
//! ```
//!
//! # Commands
//!
//! - `report` - Run one aggregation against the record store and print
//!   the report as JSON

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zenthra-cli")]
#[command(author, version, about = "Zenthra analytics CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an analytics report against the record store
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Product sales summary across all orders
    Products {
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
    },
    /// Paid-customer analytics
    Customers,
    /// Abandoned-cart analytics
    Abandoned,
    /// Dashboard headline metrics
    Dashboard,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Report { kind } => match kind {
            ReportKind::Products { start, end } => commands::report::products(start, end).await?,
            ReportKind::Customers => commands::report::customers().await?,
            ReportKind::Abandoned => commands::report::abandoned().await?,
            ReportKind::Dashboard => commands::report::dashboard().await?,
        },
    }
    Ok(())
}
