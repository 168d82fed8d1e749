//! Background Reddit loading

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use collective_core::{SubredditName, ValidationError};
use tracing::Instrument;
use uuid::Uuid;

use crate::http::dto::{LoadRedditRequest, MessageResponse};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::ingest::ingest_subreddit;

/// POST /loadRedditData - acknowledge now, import in a background task
async fn load_reddit_data(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadRedditRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let subreddit = SubredditName::new(&req.subreddit)?;
    if req.limit == 0 {
        return Err(ValidationError::InvalidFormat {
            field: "limit",
            reason: "must be at least 1",
        }
        .into());
    }

    let Some(guard) = state.ingest_jobs.try_start(&subreddit) else {
        tracing::info!(subreddit = subreddit.as_str(), "load already running");
        return Ok((
            StatusCode::ACCEPTED,
            Json(MessageResponse::new(format!(
                "A load for r/{} is already running.",
                subreddit.as_str()
            ))),
        ));
    };

    let message = format!(
        "Started loading {} posts from r/{} in the background.",
        req.limit,
        subreddit.as_str()
    );

    let job_id = Uuid::new_v4();
    let span = tracing::info_span!("ingest", %job_id, subreddit = subreddit.as_str());
    let limit = req.limit;

    tokio::spawn(
        async move {
            let _guard = guard;
            let result = ingest_subreddit(
                state.store.as_ref(),
                state.posts.as_ref(),
                state.summarizer.as_ref(),
                &subreddit,
                limit,
            )
            .await;

            if let Err(err) = result {
                tracing::error!(error = %err, "ingestion failed");
            }
        }
        .instrument(span),
    );

    Ok((StatusCode::ACCEPTED, Json(MessageResponse::new(message))))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/loadRedditData", post(load_reddit_data))
}
