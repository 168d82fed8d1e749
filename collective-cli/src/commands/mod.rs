//! Subcommand implementations

pub mod ingest;
pub mod seed;
pub mod serve;

use std::sync::Arc;

use anyhow::{Context, Result};
use collective_server::db::{create_pool_with_options, migrations};
use collective_server::{MemoryStore, PgStore, Store};

use crate::config::CollectiveConfig;

pub use ingest::{run_ingest, IngestArgs};
pub use seed::{run_seed, SeedArgs};
pub use serve::{run_serve, ServeArgs};

/// Connect, migrate and wrap the database as a store.
pub(crate) async fn open_pg_store(config: &CollectiveConfig) -> Result<Arc<dyn Store>> {
    let database_url = config.database.url.as_deref().context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.collective/.env",
    )?;

    let pool = create_pool_with_options(database_url, config.database.max_connections)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(Arc::new(PgStore::new(pool)))
}

/// PostgreSQL store, or an empty in-memory store when asked.
pub(crate) async fn open_store(
    config: &CollectiveConfig,
    in_memory: bool,
) -> Result<Arc<dyn Store>> {
    if in_memory {
        tracing::warn!("Using in-memory store, data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }
    open_pg_store(config).await
}
