//! Axum server setup
//!
//! - Permissive CORS
//! - Tracing and request timeout middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use collective_services::{PostSource, Summarizer};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::ingest::IngestJobs;
use crate::store::Store;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000)
    pub bind_addr: SocketAddr,

    /// Per-request timeout; background ingestion is not bound by it
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub summarizer: Arc<dyn Summarizer>,
    pub posts: Arc<dyn PostSource>,
    pub ingest_jobs: IngestJobs,
    /// How long a request may wait on the summarizer. Set by [`build_router`].
    pub summarize_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        summarizer: Arc<dyn Summarizer>,
        posts: Arc<dyn PostSource>,
    ) -> Self {
        Self {
            store,
            summarizer,
            posts,
            ingest_jobs: IngestJobs::new(),
            summarize_timeout: summarize_budget(ServerConfig::default().request_timeout),
        }
    }
}

/// Share of the request timeout a handler may spend waiting on the
/// summarizer, leaving the rest for the store write.
pub fn summarize_budget(request_timeout: Duration) -> Duration {
    request_timeout * 3 / 4
}

/// Build the application router with all routes.
pub fn build_router(mut state: AppState, request_timeout: Duration) -> Router {
    state.summarize_timeout = summarize_budget(request_timeout);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(routes::root::router())
        .merge(routes::problems::router())
        .merge(routes::entrepreneurs::router())
        .merge(routes::votes::router())
        .merge(routes::reddit::router())
        .merge(routes::export::router())
        .layer(middleware)
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(PgStore::new(create_pool(&database_url).await?));
/// let state = AppState::new(store, summarizer, posts);
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    if !state.summarizer.is_configured() {
        tracing::warn!("GEMINI_API_KEY not set, summaries will be placeholders");
    }

    let app = build_router(state, config.request_timeout);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
