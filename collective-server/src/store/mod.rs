//! Data access for problems, entrepreneurs and votes
//!
//! Handlers and the ingestion job only see the [`Store`] trait. Two
//! implementations exist:
//!
//! - [`PgStore`]: PostgreSQL repositories (production)
//! - [`MemoryStore`]: in-process tables with the same semantics
//!   (tests and `serve --in-memory`)

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use collective_core::{Entrepreneur, NewEntrepreneur, NewProblem, NewVote, Problem, Vote};

use crate::pagination::Page;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Optional exact-match filters for problem listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    pub source: Option<String>,
    pub category: Option<String>,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &Problem) -> bool {
        let source_ok = self
            .source
            .as_deref()
            .map_or(true, |s| problem.source == s);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| problem.category.map(|pc| pc.as_str()) == Some(c));
        source_ok && category_ok
    }
}

/// CRUD operations backing the HTTP API
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Fetch one problem.
    async fn get_problem(&self, id: i64) -> StoreResult<Problem>;

    /// Page of problems in insertion order, optionally filtered.
    async fn get_problems(&self, page: Page, filter: &ProblemFilter) -> StoreResult<Vec<Problem>>;

    /// Insert a problem and return it with id and timestamp.
    async fn create_problem(&self, problem: NewProblem) -> StoreResult<Problem>;

    /// Whether a problem with exactly this text is already stored.
    async fn problem_text_exists(&self, original_text: &str) -> StoreResult<bool>;

    async fn count_problems(&self) -> StoreResult<i64>;

    async fn get_entrepreneur(&self, id: i64) -> StoreResult<Entrepreneur>;

    async fn get_entrepreneurs(&self, page: Page) -> StoreResult<Vec<Entrepreneur>>;

    async fn create_entrepreneur(&self, entrepreneur: NewEntrepreneur) -> StoreResult<Entrepreneur>;

    /// Record a vote and bump the problem's score by one, atomically.
    ///
    /// A vote for a problem that does not exist is still recorded and no
    /// score changes.
    async fn create_vote(&self, vote: NewVote) -> StoreResult<Vote>;
}
