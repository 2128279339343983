//! FreshMart CLI - Catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Validate the built-in seed catalog
//! fm-cli catalog validate
//!
//! # Validate a catalog override before deploying it via CATALOG_PATH
//! fm-cli catalog validate --path ./catalog.json
//!
//! # List categories and their product counts
//! fm-cli catalog list
//! ```
//!
//! # Commands
//!
//! - `catalog validate` - Load a catalog and run the startup validations
//! - `catalog list` - Summarize categories and product counts

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fm-cli")]
#[command(author, version, about = "FreshMart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate product catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load a catalog and run the startup validations
    Validate {
        /// Catalog JSON file (defaults to the built-in seed catalog)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
    /// List categories and their product counts
    List {
        /// Catalog JSON file (defaults to the built-in seed catalog)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Load .env so CATALOG_PATH overrides behave as they do in the server
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Validate { path } => commands::catalog::validate(path.as_deref())?,
            CatalogAction::List { path } => commands::catalog::list(path.as_deref())?,
        },
    }
    Ok(())
}
