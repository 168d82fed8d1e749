//! HTTP server layer
//!
//! Axum server with:
//! - Permissive CORS (the frontend is served from another origin)
//! - Request tracing and timeout
//! - Graceful shutdown
//! - JSON error responses

pub mod dto;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::ApiError;
pub use server::{build_router, run_server, summarize_budget, AppState, ServerConfig, ServerError};
