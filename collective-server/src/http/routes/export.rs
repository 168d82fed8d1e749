//! JSON export of stored problems

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::http::dto::ProblemResponse;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::pagination::Page;
use crate::store::ProblemFilter;

/// Maximum problems in one export
pub const EXPORT_LIMIT: u32 = 1000;

const EXPORT_DISPOSITION: &str = "attachment; filename=\"problems.json\"";

/// GET /exportProblems - first problems by id as a downloadable file
async fn export_problems(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let problems = state
        .store
        .get_problems(Page::new(0, EXPORT_LIMIT), &ProblemFilter::default())
        .await?;

    let body: Vec<ProblemResponse> = problems.into_iter().map(ProblemResponse::from).collect();
    tracing::debug!(count = body.len(), "exporting problems");

    Ok(([(header::CONTENT_DISPOSITION, EXPORT_DISPOSITION)], Json(body)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/exportProblems", get(export_problems))
}
