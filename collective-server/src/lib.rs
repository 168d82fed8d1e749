//! collective-server: HTTP API for community problem reports
//!
//! Stores problems, votes and entrepreneur profiles, imports Reddit posts
//! in the background and summarizes text through the configured model.

pub mod db;
pub mod http;
pub mod ingest;
pub mod pagination;
pub mod seed;
pub mod store;

pub use http::{
    build_router, run_server, summarize_budget, ApiError, AppState, ServerConfig, ServerError,
};
pub use ingest::{ingest_subreddit, IngestError, IngestJobs, IngestReport};
pub use store::{MemoryStore, PgStore, ProblemFilter, Store, StoreError};
