//! In-process store
//!
//! Mirrors the PostgreSQL semantics: ids start at 1 and increase, listing
//! is by insertion order, votes for unknown problems are kept.

use async_trait::async_trait;
use chrono::Utc;
use collective_core::{Entrepreneur, NewEntrepreneur, NewProblem, NewVote, Problem, Vote};
use tokio::sync::Mutex;

use super::{ProblemFilter, Store, StoreError, StoreResult};
use crate::pagination::Page;

#[derive(Default)]
struct Tables {
    problems: Vec<Problem>,
    entrepreneurs: Vec<Entrepreneur>,
    votes: Vec<Vote>,
}

/// Store backed by in-memory tables
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded votes for a problem.
    pub async fn vote_count(&self, problem_id: i64) -> usize {
        let tables = self.tables.lock().await;
        tables
            .votes
            .iter()
            .filter(|v| v.problem_id == problem_id)
            .count()
    }
}

fn page_of<T: Clone>(items: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    items
        .skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_problem(&self, id: i64) -> StoreResult<Problem> {
        let tables = self.tables.lock().await;
        tables
            .problems
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("problem", id))
    }

    async fn get_problems(&self, page: Page, filter: &ProblemFilter) -> StoreResult<Vec<Problem>> {
        let tables = self.tables.lock().await;
        Ok(page_of(
            tables.problems.iter().filter(|p| filter.matches(p)).cloned(),
            page,
        ))
    }

    async fn create_problem(&self, problem: NewProblem) -> StoreResult<Problem> {
        let mut tables = self.tables.lock().await;
        let row = Problem {
            id: next_id(tables.problems.len()),
            source: problem.source.as_str().to_string(),
            subreddit: problem.subreddit,
            author_username: problem.author_username,
            author_karma: problem.author_karma,
            original_text: problem.original_text.into_string(),
            summary: problem.summary,
            keywords: problem.keywords,
            category: problem.category,
            created_at: Utc::now(),
            score: problem.score,
            processed: problem.processed,
        };
        tables.problems.push(row.clone());
        Ok(row)
    }

    async fn problem_text_exists(&self, original_text: &str) -> StoreResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .problems
            .iter()
            .any(|p| p.original_text == original_text))
    }

    async fn count_problems(&self) -> StoreResult<i64> {
        let tables = self.tables.lock().await;
        Ok(tables.problems.len() as i64)
    }

    async fn get_entrepreneur(&self, id: i64) -> StoreResult<Entrepreneur> {
        let tables = self.tables.lock().await;
        tables
            .entrepreneurs
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("entrepreneur", id))
    }

    async fn get_entrepreneurs(&self, page: Page) -> StoreResult<Vec<Entrepreneur>> {
        let tables = self.tables.lock().await;
        Ok(page_of(tables.entrepreneurs.iter().cloned(), page))
    }

    async fn create_entrepreneur(
        &self,
        entrepreneur: NewEntrepreneur,
    ) -> StoreResult<Entrepreneur> {
        let mut tables = self.tables.lock().await;
        let row = Entrepreneur {
            id: next_id(tables.entrepreneurs.len()),
            name: entrepreneur.name,
            organization: entrepreneur.organization,
            expertise: entrepreneur.expertise,
            description: entrepreneur.description,
            email: entrepreneur.email.as_str().to_string(),
            created_at: Utc::now(),
        };
        tables.entrepreneurs.push(row.clone());
        Ok(row)
    }

    async fn create_vote(&self, vote: NewVote) -> StoreResult<Vote> {
        // One lock covers both writes, like the transaction in PgStore
        let mut tables = self.tables.lock().await;
        let row = Vote {
            id: next_id(tables.votes.len()),
            problem_id: vote.problem_id,
            user_identifier: vote.user_identifier,
            created_at: Utc::now(),
        };

        if let Some(problem) = tables.problems.iter_mut().find(|p| p.id == row.problem_id) {
            problem.score += 1;
        } else {
            tracing::debug!(problem_id = row.problem_id, "vote recorded for unknown problem");
        }

        tables.votes.push(row.clone());
        Ok(row)
    }
}
