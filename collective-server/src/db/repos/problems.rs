//! Problem repository
//!
//! Handles problem reads and inserts with:
//! - Optional exact-match filters on source and category
//! - Exact-text lookup for ingestion de-duplication

use chrono::{DateTime, Utc};
use collective_core::{Category, NewProblem, Problem};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{DbError, DbResult};
use crate::pagination::Page;
use crate::store::ProblemFilter;

const PROBLEM_COLUMNS: &str = "id, source, subreddit, author_username, author_karma, \
     original_text, summary, keywords, category, created_at, score, processed";

/// Problem record from database
#[derive(Debug, Clone, FromRow)]
pub struct ProblemRow {
    pub id: i64,
    pub source: String,
    pub subreddit: Option<String>,
    pub author_username: Option<String>,
    pub author_karma: Option<i64>,
    pub original_text: String,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub score: i64,
    pub processed: bool,
}

impl From<ProblemRow> for Problem {
    fn from(row: ProblemRow) -> Self {
        Self {
            id: row.id,
            source: row.source,
            subreddit: row.subreddit,
            author_username: row.author_username,
            author_karma: row.author_karma,
            original_text: row.original_text,
            summary: row.summary,
            keywords: row.keywords,
            category: row.category.as_deref().map(Category::from_label_lossy),
            created_at: row.created_at,
            score: row.score,
            processed: row.processed,
        }
    }
}

/// Problem repository
pub struct ProblemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProblemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a single problem by id.
    pub async fn get(&self, id: i64) -> DbResult<Problem> {
        let row: ProblemRow = sqlx::query_as(&format!(
            "SELECT {PROBLEM_COLUMNS} FROM problems WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("problem", id))?;

        Ok(row.into())
    }

    /// List problems by id with optional filters.
    pub async fn list(&self, page: Page, filter: &ProblemFilter) -> DbResult<Vec<Problem>> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PROBLEM_COLUMNS} FROM problems WHERE TRUE"));

        if let Some(source) = &filter.source {
            builder.push(" AND source = ");
            builder.push_bind(source);
        }
        if let Some(category) = &filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category);
        }

        builder.push(" ORDER BY id LIMIT ");
        builder.push_bind(page.limit());
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows: Vec<ProblemRow> = builder.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Problem::from).collect())
    }

    /// Insert a problem and return the stored row.
    pub async fn create(&self, problem: NewProblem) -> DbResult<Problem> {
        let row: ProblemRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO problems (
                source, subreddit, author_username, author_karma, original_text,
                summary, keywords, category, score, processed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PROBLEM_COLUMNS}
            "#
        ))
        .bind(problem.source.as_str())
        .bind(problem.subreddit.as_deref())
        .bind(problem.author_username.as_deref())
        .bind(problem.author_karma)
        .bind(problem.original_text.as_str())
        .bind(problem.summary.as_deref())
        .bind(&problem.keywords)
        .bind(problem.category.map(|c| c.as_str()))
        .bind(problem.score)
        .bind(problem.processed)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Whether a problem with exactly this text exists.
    pub async fn text_exists(&self, original_text: &str) -> DbResult<bool> {
        // md5 comparison first so the digest index is usable
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM problems
                WHERE md5(original_text) = md5($1) AND original_text = $1
            )
            "#,
        )
        .bind(original_text)
        .fetch_one(self.pool)
        .await?;

        Ok(exists.0)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM problems")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collective_core::{ProblemText, Source};

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn keywords_keep_order_and_commas() {
        let pool = pool().await;
        let repo = ProblemRepo::new(&pool);

        let mut new =
            NewProblem::new(Source::User, ProblemText::new("array column check").unwrap());
        new.keywords = vec!["b".into(), "a, with comma".into(), "c".into()];
        let created = repo.create(new).await.unwrap();

        let read = repo.get(created.id).await.unwrap();
        assert_eq!(read.keywords, vec!["b", "a, with comma", "c"]);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn empty_keywords_read_back_empty() {
        let pool = pool().await;
        let repo = ProblemRepo::new(&pool);

        let created = repo
            .create(NewProblem::new(Source::User, ProblemText::new("no keywords").unwrap()))
            .await
            .unwrap();
        assert!(repo.get(created.id).await.unwrap().keywords.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn source_filter_excludes_other_sources() {
        let pool = pool().await;
        let repo = ProblemRepo::new(&pool);

        repo.create(NewProblem::new(Source::User, ProblemText::new("user row").unwrap()))
            .await
            .unwrap();

        let filter = ProblemFilter {
            source: Some("Reddit".into()),
            category: None,
        };
        let rows = repo.list(Page::new(0, 10_000), &filter).await.unwrap();
        assert!(rows.iter().all(|p| p.source == "Reddit"));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_problem_is_not_found() {
        let pool = pool().await;
        let err = ProblemRepo::new(&pool).get(i64::MAX).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "problem", .. }));
    }
}
