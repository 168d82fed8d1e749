//! Router test helpers

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use collective_services::{
    PlaceholderSummarizer, PostSource, RedditError, RedditPost, Summarizer, UnconfiguredPostSource,
};
use tokio::sync::Notify;

use super::server::{build_router, summarize_budget, AppState};
use crate::ingest::IngestJobs;
use crate::store::{MemoryStore, Store};

/// Posts served from a fixed list
pub struct FixedPosts(pub Vec<RedditPost>);

#[async_trait]
impl PostSource for FixedPosts {
    async fn fetch_posts(
        &self,
        _subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, RedditError> {
        Ok(self.0.iter().take(limit as usize).cloned().collect())
    }
}

/// Source that holds every fetch until released
#[derive(Default)]
pub struct GatedPosts {
    pub release: Notify,
}

#[async_trait]
impl PostSource for GatedPosts {
    async fn fetch_posts(
        &self,
        _subreddit: &str,
        _limit: u32,
    ) -> Result<Vec<RedditPost>, RedditError> {
        self.release.notified().await;
        Ok(Vec::new())
    }
}

pub fn reddit_post(id: &str, title: &str, selftext: &str) -> RedditPost {
    RedditPost {
        id: id.into(),
        title: title.into(),
        selftext: selftext.into(),
        created_utc: 1_700_000_000.0,
        score: 5,
        subreddit: "cityplanning".into(),
        author_username: "poster".into(),
        author_karma: 77,
    }
}

/// Router over a memory store with swappable services
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub summarizer: Arc<dyn Summarizer>,
    pub posts: Arc<dyn PostSource>,
    pub jobs: IngestJobs,
    pub request_timeout: Duration,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            summarizer: Arc::new(PlaceholderSummarizer),
            posts: Arc::new(UnconfiguredPostSource),
            jobs: IngestJobs::new(),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_posts(mut self, posts: Arc<dyn PostSource>) -> Self {
        self.posts = posts;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn router(&self) -> Router {
        let store: Arc<dyn Store> = self.store.clone();
        let state = AppState {
            store,
            summarizer: Arc::clone(&self.summarizer),
            posts: Arc::clone(&self.posts),
            ingest_jobs: self.jobs.clone(),
            summarize_timeout: summarize_budget(self.request_timeout),
        };
        build_router(state, self.request_timeout)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
