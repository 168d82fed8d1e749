//! Vote endpoint

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use collective_core::NewVote;

use crate::http::dto::{VoteRequest, VoteResponse};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// POST /voteProblem - record a vote and bump the score
async fn vote_problem(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoteRequest>,
) -> Result<(StatusCode, Json<VoteResponse>), ApiError> {
    let vote = NewVote::new(req.problem_id, &req.user_identifier)?;
    let created = state.store.create_vote(vote).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/voteProblem", post(vote_problem))
}
