//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use collective_server::http::{run_server, AppState, ServerConfig};
use collective_server::seed::seed_if_empty;

use super::open_store;
use crate::config::CollectiveConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep data in memory instead of PostgreSQL (local demos)
    #[arg(long)]
    pub in_memory: bool,

    /// Skip inserting demo data into an empty database
    #[arg(long)]
    pub no_seed: bool,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: CollectiveConfig) -> Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(timeout) = args.timeout {
        config.server.request_timeout_secs = timeout;
    }

    let store = open_store(&config, args.in_memory).await?;

    if !args.no_seed {
        let seeded = seed_if_empty(store.as_ref())
            .await
            .context("Failed to seed demo data")?;
        if seeded {
            tracing::info!("Database was empty, added demo problems and entrepreneurs");
        }
    }

    let state = AppState::new(store, config.summarizer()?, config.post_source()?);
    let server = ServerConfig {
        bind_addr: config.server.bind,
        request_timeout: config.request_timeout(),
    };

    tracing::info!("Starting collective server on {}", server.bind_addr);

    run_server(state, server).await.context("Server error")?;

    Ok(())
}
