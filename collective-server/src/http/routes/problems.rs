//! Problem endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use collective_core::{NewProblem, ProblemText, Source};
use collective_services::Analysis;
use serde::Deserialize;

use crate::http::dto::{ProblemResponse, SubmitProblemRequest};
use crate::http::error::ApiError;
use crate::http::extractors::ValidId;
use crate::http::server::AppState;
use crate::pagination::{Page, PageParams};
use crate::store::ProblemFilter;

/// Query for problem listing
#[derive(Debug, Default, Deserialize)]
pub struct ProblemQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub source: Option<String>,
    pub category: Option<String>,
}

impl ProblemQuery {
    fn split(self) -> (Page, ProblemFilter) {
        let page = Page::from(PageParams {
            skip: self.skip,
            limit: self.limit,
        });
        let filter = ProblemFilter {
            source: self.source,
            category: self.category,
        };
        (page, filter)
    }
}

/// GET /getProblems
async fn list_problems(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProblemQuery>,
) -> Result<Json<Vec<ProblemResponse>>, ApiError> {
    let (page, filter) = query.split();
    let problems = state.store.get_problems(page, &filter).await?;
    Ok(Json(problems.into_iter().map(ProblemResponse::from).collect()))
}

/// GET /problems/{id}
async fn get_problem(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ProblemResponse>, ApiError> {
    let problem = state.store.get_problem(id).await?;
    Ok(Json(problem.into()))
}

/// POST /submitProblem - summarize, then store as a processed user problem
async fn submit_problem(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitProblemRequest>,
) -> Result<(StatusCode, Json<ProblemResponse>), ApiError> {
    let text = ProblemText::new(&req.text)?;
    let author = req.author();

    let budget = state.summarize_timeout;
    let summarize = state.summarizer.summarize(text.as_str(), Source::User);
    let analysis = tokio::time::timeout(budget, summarize)
        .await
        .unwrap_or_else(|_| {
            tracing::warn!(?budget, "summarizer timed out, using fallback");
            Analysis::failed(format!("timed out after {budget:?}"))
        });

    let mut problem = NewProblem::new(Source::User, text);
    problem.author_username = Some(author);
    problem.summary = Some(analysis.summary);
    problem.keywords = analysis.keywords;
    problem.category = Some(analysis.category);
    problem.processed = true;

    let created = state.store.create_problem(problem).await?;
    tracing::info!(problem_id = created.id, "problem submitted");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Problem routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getProblems", get(list_problems))
        .route("/problems/{id}", get(get_problem))
        .route("/submitProblem", post(submit_problem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use collective_core::Category;
    use collective_services::{GeminiConfig, GeminiSummarizer, PlaceholderSummarizer, Summarizer};
    use serde_json::json;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::http::test_support::{body_json, get, post_json, TestApp};
    use crate::store::Store;

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, text: &str, source: Source) -> Analysis {
            Analysis {
                summary: format!("{}: {}", source.as_str(), text),
                keywords: vec!["roads".into(), "safety".into()],
                category: Category::Traffic,
            }
        }
    }

    #[tokio::test]
    async fn submit_without_model_stores_placeholder() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(post_json("/submitProblem", json!({"text": "Broken streetlights on 5th"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let placeholder = PlaceholderSummarizer.summarize("", Source::User).await;
        assert_eq!(body["source"], "User");
        assert_eq!(body["author_username"], "anonymous");
        assert_eq!(body["processed"], true);
        assert_eq!(body["score"], 0);
        assert_eq!(body["summary"], placeholder.summary);
        assert_eq!(body["keywords"], json!(["placeholder", "ai"]));
        assert_eq!(body["category"], "Other");
    }

    #[tokio::test]
    async fn submit_uses_summarizer_output() {
        let app = TestApp::new().with_summarizer(Arc::new(EchoSummarizer));
        let response = app
            .router()
            .oneshot(post_json(
                "/submitProblem",
                json!({"text": "Crosswalk paint faded", "user": "dana"}),
            ))
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["summary"], "User: Crosswalk paint faded");
        assert_eq!(body["keywords"], json!(["roads", "safety"]));
        assert_eq!(body["category"], "Traffic");
        assert_eq!(body["author_username"], "dana");
    }

    async fn slow_gemini(delay: Duration) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "candidates": [{ "content": { "parts": [{
                            "text": "{\"summary\":\"late\",\"keywords\":[],\"category\":\"Traffic\"}"
                        }] } }]
                    }))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn slow_model_still_stores_problem() {
        let server = slow_gemini(Duration::from_secs(5)).await;
        // Client timeout longer than the request timeout
        let gemini = GeminiSummarizer::new(GeminiConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(10),
            ..GeminiConfig::new("test-key")
        })
        .unwrap();
        let app = TestApp::new()
            .with_summarizer(Arc::new(gemini))
            .with_request_timeout(Duration::from_secs(1));

        let response = app
            .router()
            .oneshot(post_json("/submitProblem", json!({"text": "Bridge closed again"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("AI processing failed: "));
        assert_eq!(body["keywords"], json!(["error"]));
        assert_eq!(body["category"], "Other");
        assert_eq!(app.store.count_problems().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn model_client_timeout_becomes_fallback_summary() {
        let server = slow_gemini(Duration::from_secs(5)).await;
        let gemini = GeminiSummarizer::new(GeminiConfig {
            base_url: server.uri(),
            timeout: Duration::from_millis(200),
            ..GeminiConfig::new("test-key")
        })
        .unwrap();
        let app = TestApp::new()
            .with_summarizer(Arc::new(gemini))
            .with_request_timeout(Duration::from_secs(2));

        let response = app
            .router()
            .oneshot(post_json("/submitProblem", json!({"text": "Bridge closed again"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("AI processing failed: request failed"));
    }

    #[tokio::test]
    async fn submit_rejects_blank_text() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(post_json("/submitProblem", json!({"text": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "validation_error");
        assert_eq!(app.store.count_problems().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn submit_requires_text_field() {
        let app = TestApp::new();
        let response = app
            .router()
            .oneshot(post_json("/submitProblem", json!({"user": "dana"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn source_filter_excludes_user_rows() {
        let app = TestApp::new();
        crate::seed::seed(app.store.as_ref()).await.unwrap();
        let router = app.router();

        let response = router
            .clone()
            .oneshot(get("/getProblems?source=Reddit"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|p| p["source"] == "Reddit"));

        let response = router
            .oneshot(get("/getProblems?category=Environment"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["source"], "User");
    }

    #[tokio::test]
    async fn listing_pages_in_insertion_order() {
        let app = TestApp::new();
        let router = app.router();
        for i in 0..5 {
            router
                .clone()
                .oneshot(post_json("/submitProblem", json!({"text": format!("problem {i}")})))
                .await
                .unwrap();
        }

        let response = router
            .oneshot(get("/getProblems?skip=1&limit=2"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let texts: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["original_text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["problem 1", "problem 2"]);
    }

    #[tokio::test]
    async fn negative_skip_is_rejected() {
        let app = TestApp::new();
        let response = app.router().oneshot(get("/getProblems?skip=-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_problem_by_id() {
        let app = TestApp::new();
        crate::seed::seed(app.store.as_ref()).await.unwrap();
        let router = app.router();

        let response = router.clone().oneshot(get("/problems/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["score"], 128);
        assert_eq!(body["keywords"], json!(["traffic", "infrastructure", "urban planning"]));

        let response = router.clone().oneshot(get("/problems/99")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router.oneshot(get("/problems/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
