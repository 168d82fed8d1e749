//! collective CLI - run and maintain the Collective Problems API
//!
//! - `serve`: HTTP API (PostgreSQL or in-memory)
//! - `ingest`: import hot Reddit self posts once
//! - `seed`: insert demo problems and entrepreneurs

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use commands::{IngestArgs, SeedArgs, ServeArgs};
use config::CollectiveConfig;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "collective",
    author,
    version,
    about = "Collect, summarize and vote on community problems"
)]
struct Cli {
    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (needs the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),
    /// Import hot posts from a subreddit
    Ingest(IngestArgs),
    /// Insert demo problems and entrepreneurs
    Seed(SeedArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })?;

    let config = CollectiveConfig::load()?;

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await,
        Commands::Ingest(args) => commands::run_ingest(args, config).await,
        Commands::Seed(args) => commands::run_seed(args, config).await,
    };

    tracing_setup::shutdown_otel();
    result
}
