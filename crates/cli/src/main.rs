//! Orchard Lane CLI - Catalogue maintenance and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Enrich a raw product export with canonical categories and brands
//! ol-cli catalog enrich -i export.csv -o enriched.csv
//!
//! # Check that the commerce backend is reachable
//! ol-cli backend ping
//! ```
//!
//! # Commands
//!
//! - `catalog enrich` - One-shot CSV-to-CSV column enrichment
//! - `backend ping` - Backend health check

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ol-cli")]
#[command(author, version, about = "Orchard Lane CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalogue maintenance
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Commerce backend checks
    Backend {
        #[command(subcommand)]
        action: BackendAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Enrich a raw product CSV export with canonical columns
    Enrich {
        /// Input CSV file (raw export)
        #[arg(short, long)]
        input: std::path::PathBuf,

        /// Output CSV file (enriched)
        #[arg(short, long)]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
enum BackendAction {
    /// Check that the backend's health endpoint responds
    Ping,
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
        Commands::Catalog { action } => match action {
            CatalogAction::Enrich { input, output } => {
                commands::catalog::enrich_file(&input, &output)?;
            }
        },
        Commands::Backend { action } => match action {
            BackendAction::Ping => commands::backend::ping().await?,
        },
    }
    Ok(())
}
