//! Agent Marketplace CLI - migrations and catalog inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the session store table
//! mp-cli migrate
//!
//! # Show the attribute filter a facet query compiles to
//! mp-cli filter 'roles=sales&trust=verified' --pin category=agent
//!
//! # Project raw product JSON into listing or detail offerings
//! mp-cli project product.json --detail
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use agent_marketplace_core::catalog::PinnedFacet;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mp-cli")]
#[command(author, version, about = "Agent Marketplace CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations (session store)
    Migrate,
    /// Compile a facet query string into a Saleor attribute filter
    Filter {
        /// Query string, e.g. `roles=sales,hr&trust=verified`
        #[arg(default_value = "")]
        query: String,

        /// Facet fixed by a landing page, as `facet=value`
        #[arg(short, long)]
        pin: Option<PinnedFacet>,
    },
    /// Project raw product JSON into offerings
    Project {
        /// File holding a product object or an array of them
        file: PathBuf,

        /// Include plans and detail fields
        #[arg(short, long)]
        detail: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Filter { query, pin } => commands::filter::run(&query, pin.as_ref())?,
        Commands::Project { file, detail } => commands::project::run(&file, detail)?,
    }
    Ok(())
}
