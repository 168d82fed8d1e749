//! Welcome and health endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::http::dto::MessageResponse;

const WELCOME: &str = "Welcome to the Collective Problems API";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /
async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse::new(WELCOME))
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
}
