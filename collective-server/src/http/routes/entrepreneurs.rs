//! Entrepreneur endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use collective_core::{non_blank, Email, NewEntrepreneur};

use crate::http::dto::{optional_text, CreateEntrepreneurRequest, EntrepreneurResponse};
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::pagination::{Page, PageParams};

/// GET /getEntrepreneurs
async fn list_entrepreneurs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<EntrepreneurResponse>>, ApiError> {
    let entrepreneurs = state.store.get_entrepreneurs(Page::from(params)).await?;
    Ok(Json(
        entrepreneurs
            .into_iter()
            .map(EntrepreneurResponse::from)
            .collect(),
    ))
}

/// GET /entrepreneurs/{id}
async fn get_entrepreneur(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<EntrepreneurResponse>, ApiError> {
    let entrepreneur = state.store.get_entrepreneur(id).await?;
    Ok(Json(entrepreneur.into()))
}

/// POST /entrepreneurs
async fn create_entrepreneur(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateEntrepreneurRequest>,
) -> Result<(StatusCode, Json<EntrepreneurResponse>), ApiError> {
    let new = NewEntrepreneur {
        name: non_blank("name", &req.name)?,
        email: Email::new(&req.email)?,
        organization: optional_text(req.organization),
        description: optional_text(req.description),
        expertise: req.expertise,
    };

    let created = state.store.create_entrepreneur(new).await?;
    tracing::info!(entrepreneur_id = created.id, "entrepreneur created");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Entrepreneur routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getEntrepreneurs", get(list_entrepreneurs))
        .route("/entrepreneurs", post(create_entrepreneur))
        .route("/entrepreneurs/{id}", get(get_entrepreneur))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::http::test_support::{body_json, get, post_json, TestApp};

    #[tokio::test]
    async fn list_omits_email() {
        let app = TestApp::new();
        crate::seed::seed(app.store.as_ref()).await.unwrap();

        let response = app.router().oneshot(get("/getEntrepreneurs")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Alice Johnson");
        assert_eq!(rows[0]["expertise"], json!(["Healthcare", "Technology"]));
        assert!(rows.iter().all(|e| e.get("email").is_none()));
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let app = TestApp::new();
        let router = app.router();

        let response = router
            .clone()
            .oneshot(post_json(
                "/entrepreneurs",
                json!({
                    "name": "Carol Diaz",
                    "organization": "Civic Labs",
                    "expertise": "Education, Technology",
                    "email": "carol@civiclabs.org"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["expertise"], json!(["Education", "Technology"]));
        assert!(created.get("email").is_none());
        assert!(created["description"].is_null());

        let uri = format!("/entrepreneurs/{}", created["id"]);
        let response = router.oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["name"], "Carol Diaz");
    }

    #[tokio::test]
    async fn create_validates_email_and_name() {
        let app = TestApp::new();
        let router = app.router();

        let response = router
            .clone()
            .oneshot(post_json(
                "/entrepreneurs",
                json!({"name": "Carol", "email": "nope"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(post_json(
                "/entrepreneurs",
                json!({"name": " ", "email": "c@x.org"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_entrepreneur_is_404() {
        let app = TestApp::new();
        let response = app.router().oneshot(get("/entrepreneurs/5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "not_found");
    }
}
