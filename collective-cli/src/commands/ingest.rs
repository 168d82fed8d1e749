//! One-shot Reddit ingestion from the command line

use anyhow::{Context, Result};
use clap::Parser;
use collective_core::SubredditName;
use collective_server::ingest_subreddit;

use super::open_pg_store;
use crate::config::CollectiveConfig;

/// Arguments for the ingest command
#[derive(Parser, Debug)]
pub struct IngestArgs {
    /// Subreddit to import from (with or without the r/ prefix)
    #[arg(long, short = 's')]
    pub subreddit: String,

    /// Number of hot posts to fetch
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: u32,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_ingest(args: IngestArgs, mut config: CollectiveConfig) -> Result<()> {
    if let Some(url) = args.database_url {
        config.database.url = Some(url);
    }

    let subreddit = SubredditName::new(&args.subreddit)
        .with_context(|| format!("Invalid subreddit: {}", args.subreddit))?;

    let store = open_pg_store(&config).await?;
    let posts = config.post_source()?;
    let summarizer = config.summarizer()?;

    let report = ingest_subreddit(
        store.as_ref(),
        posts.as_ref(),
        summarizer.as_ref(),
        &subreddit,
        args.limit,
    )
    .await
    .with_context(|| format!("Ingestion of r/{} failed", subreddit.as_str()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "r/{}: fetched {}, skipped {}, created {}",
            subreddit.as_str(),
            report.fetched,
            report.skipped,
            report.created
        );
    }

    Ok(())
}
