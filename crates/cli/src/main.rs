//! Cedar Market CLI - Snapshot inspection and catalog checks.
//!
//! # Usage
//!
//! ```bash
//! # Print the persisted cart
//! cm-cli cart show
//!
//! # Delete the persisted cart snapshot
//! cm-cli cart clear
//!
//! # Print the persisted session
//! cm-cli session show
//!
//! # List catalog products / offers through the live API
//! cm-cli catalog products
//! cm-cli catalog offers
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect or clear the cart snapshot
//! - `session` - Inspect the session snapshot
//! - `catalog` - Query the catalog API

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cm-cli")]
#[command(author, version, about = "Cedar Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear the cart snapshot
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect the session snapshot
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Query the catalog API
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the persisted cart
    Show,
    /// Delete the persisted cart snapshot
    Clear,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the persisted session
    Show,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products served by the catalog API
    Products,
    /// List special offers served by the catalog API
    Offers,
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
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show().await?,
            CartAction::Clear => commands::cart::clear().await?,
        },
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show().await?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Products => commands::catalog::products().await?,
            CatalogAction::Offers => commands::catalog::offers().await?,
        },
    }
    Ok(())
}
