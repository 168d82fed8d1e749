//! Database layer - connection pool, schema and repositories
//!
//! - Connection pool with explicit limits
//! - Schema created idempotently at startup
//! - Transactions for multi-step writes (vote + score)

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;
