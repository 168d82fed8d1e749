//! Vote repository
//!
//! A vote insert and the score increment commit together or not at all.

use chrono::{DateTime, Utc};
use collective_core::{NewVote, Vote};
use sqlx::{FromRow, PgPool};

use super::DbResult;

/// Vote record from database
#[derive(Debug, Clone, FromRow)]
pub struct VoteRow {
    pub id: i64,
    pub problem_id: i64,
    pub user_identifier: String,
    pub created_at: DateTime<Utc>,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Self {
            id: row.id,
            problem_id: row.problem_id,
            user_identifier: row.user_identifier,
            created_at: row.created_at,
        }
    }
}

/// Vote repository
pub struct VoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a vote and bump the problem's score (atomic).
    ///
    /// No error when the problem does not exist; the vote is kept.
    pub async fn create(&self, vote: NewVote) -> DbResult<Vote> {
        let mut tx = self.pool.begin().await?;

        let row: VoteRow = sqlx::query_as(
            r#"
            INSERT INTO votes (problem_id, user_identifier)
            VALUES ($1, $2)
            RETURNING id, problem_id, user_identifier, created_at
            "#,
        )
        .bind(vote.problem_id)
        .bind(&vote.user_identifier)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query("UPDATE problems SET score = score + 1 WHERE id = $1")
            .bind(vote.problem_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            tracing::debug!(problem_id = vote.problem_id, "vote recorded for unknown problem");
        }

        tx.commit().await?;
        Ok(row.into())
    }

    /// Number of votes recorded for a problem.
    pub async fn count_for_problem(&self, problem_id: i64) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM votes WHERE problem_id = $1")
            .bind(problem_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}
