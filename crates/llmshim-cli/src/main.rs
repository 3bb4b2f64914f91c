//! CLI entry point.
//!
//! Parses arguments, initializes logging, loads the environment, and
//! dispatches to the selected gateway's bootstrap.

mod bootstrap;
mod parser;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parser::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; --verbose raises the default level, RUST_LOG
    // still wins when set.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Completion(args) => bootstrap::run_completion(args).await,
        Commands::Embedding(args) => bootstrap::run_embedding(args).await,
    }
}
