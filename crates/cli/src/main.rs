//! WooCommerce mirror CLI - migrations and one-off mirror passes.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! woo-mirror-cli migrate
//!
//! # Run one incremental order sync pass
//! woo-mirror-cli sync
//!
//! # Run one retention cleanup pass
//! woo-mirror-cli cleanup
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "woo-mirror-cli")]
#[command(version, about = "WooCommerce mirror CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run one incremental order sync pass
    Sync,
    /// Run one retention cleanup pass
    Cleanup,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Sync => commands::passes::sync().await?,
        Commands::Cleanup => commands::passes::cleanup().await?,
    }
    Ok(())
}
