mod channel;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::channel::PlatformArg;

#[derive(Debug, Parser)]
#[command(name = "skulink")]
#[command(about = "Catalog sync between Shopify, WooCommerce, and eBay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pull a platform catalog into canonical JSON
    Pull {
        /// Platform to pull from
        #[arg(long, value_enum)]
        from: PlatformArg,

        /// Write the catalog to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Push a canonical JSON catalog into a platform
    Push {
        /// Platform to push into
        #[arg(long, value_enum)]
        to: PlatformArg,

        /// Canonical catalog file, as produced by `pull`
        #[arg(long)]
        input: PathBuf,

        /// Preview planned changes without writing to the platform
        #[arg(long)]
        dry_run: bool,
    },
    /// Pull one platform's catalog and push it into another
    Sync {
        /// Platform to pull from
        #[arg(long, value_enum)]
        from: PlatformArg,

        /// Platform to push into
        #[arg(long, value_enum)]
        to: PlatformArg,

        /// Preview planned changes without writing to the target
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = skulink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // Logs go to stderr; `pull` without --out owns stdout for catalog JSON.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Pull { from, out } => commands::run_pull(&config, from, out.as_deref()).await,
        Commands::Push { to, input, dry_run } => {
            commands::run_push(&config, to, &input, dry_run).await
        }
        Commands::Sync { from, to, dry_run } => {
            commands::run_sync(&config, from, to, dry_run).await
        }
    }
}
