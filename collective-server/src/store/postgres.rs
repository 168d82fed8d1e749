//! PostgreSQL-backed store

use async_trait::async_trait;
use collective_core::{Entrepreneur, NewEntrepreneur, NewProblem, NewVote, Problem, Vote};
use sqlx::PgPool;

use super::{ProblemFilter, Store, StoreResult};
use crate::db::{EntrepreneurRepo, ProblemRepo, VoteRepo};
use crate::pagination::Page;

/// Store over a connection pool, delegating to the repositories
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_problem(&self, id: i64) -> StoreResult<Problem> {
        ProblemRepo::new(&self.pool).get(id).await
    }

    async fn get_problems(&self, page: Page, filter: &ProblemFilter) -> StoreResult<Vec<Problem>> {
        ProblemRepo::new(&self.pool).list(page, filter).await
    }

    async fn create_problem(&self, problem: NewProblem) -> StoreResult<Problem> {
        ProblemRepo::new(&self.pool).create(problem).await
    }

    async fn problem_text_exists(&self, original_text: &str) -> StoreResult<bool> {
        ProblemRepo::new(&self.pool).text_exists(original_text).await
    }

    async fn count_problems(&self) -> StoreResult<i64> {
        ProblemRepo::new(&self.pool).count().await
    }

    async fn get_entrepreneur(&self, id: i64) -> StoreResult<Entrepreneur> {
        EntrepreneurRepo::new(&self.pool).get(id).await
    }

    async fn get_entrepreneurs(&self, page: Page) -> StoreResult<Vec<Entrepreneur>> {
        EntrepreneurRepo::new(&self.pool).list(page).await
    }

    async fn create_entrepreneur(
        &self,
        entrepreneur: NewEntrepreneur,
    ) -> StoreResult<Entrepreneur> {
        EntrepreneurRepo::new(&self.pool).create(entrepreneur).await
    }

    async fn create_vote(&self, vote: NewVote) -> StoreResult<Vote> {
        VoteRepo::new(&self.pool).create(vote).await
    }
}
