//! Demo data command

use anyhow::{Context, Result};
use clap::Parser;
use collective_server::seed::{seed, seed_if_empty};

use super::open_pg_store;
use crate::config::CollectiveConfig;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Insert demo rows even when problems already exist
    #[arg(long)]
    pub force: bool,
}

pub async fn run_seed(args: SeedArgs, mut config: CollectiveConfig) -> Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }

    let store = open_pg_store(&config).await?;

    if args.force {
        seed(store.as_ref()).await.context("Failed to seed demo data")?;
        println!("Inserted demo data");
    } else if seed_if_empty(store.as_ref())
        .await
        .context("Failed to seed demo data")?
    {
        println!("Inserted demo data");
    } else {
        println!("Problems already present, nothing inserted (use --force to add anyway)");
    }

    Ok(())
}
