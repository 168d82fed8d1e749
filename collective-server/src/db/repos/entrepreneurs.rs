//! Entrepreneur repository

use chrono::{DateTime, Utc};
use collective_core::{Entrepreneur, NewEntrepreneur};
use sqlx::{FromRow, PgPool};

use super::{DbError, DbResult};
use crate::pagination::Page;

/// Entrepreneur record from database
#[derive(Debug, Clone, FromRow)]
pub struct EntrepreneurRow {
    pub id: i64,
    pub name: String,
    pub organization: Option<String>,
    pub expertise: Vec<String>,
    pub description: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<EntrepreneurRow> for Entrepreneur {
    fn from(row: EntrepreneurRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            organization: row.organization,
            expertise: row.expertise,
            description: row.description,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

/// Entrepreneur repository
pub struct EntrepreneurRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EntrepreneurRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Entrepreneur> {
        let row: EntrepreneurRow = sqlx::query_as(
            r#"
            SELECT id, name, organization, expertise, description, email, created_at
            FROM entrepreneurs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("entrepreneur", id))?;

        Ok(row.into())
    }

    pub async fn list(&self, page: Page) -> DbResult<Vec<Entrepreneur>> {
        let rows: Vec<EntrepreneurRow> = sqlx::query_as(
            r#"
            SELECT id, name, organization, expertise, description, email, created_at
            FROM entrepreneurs
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Entrepreneur::from).collect())
    }

    pub async fn create(&self, entrepreneur: NewEntrepreneur) -> DbResult<Entrepreneur> {
        let row: EntrepreneurRow = sqlx::query_as(
            r#"
            INSERT INTO entrepreneurs (name, organization, expertise, description, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, organization, expertise, description, email, created_at
            "#,
        )
        .bind(&entrepreneur.name)
        .bind(entrepreneur.organization.as_deref())
        .bind(&entrepreneur.expertise)
        .bind(entrepreneur.description.as_deref())
        .bind(entrepreneur.email.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collective_core::Email;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_and_get() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        let repo = EntrepreneurRepo::new(&pool);

        let created = repo
            .create(NewEntrepreneur {
                name: "Carol".into(),
                organization: Some("Civic Labs".into()),
                expertise: vec!["Education".into(), "Technology".into()],
                description: None,
                email: Email::new("carol@civiclabs.org").unwrap(),
            })
            .await
            .unwrap();

        let read = repo.get(created.id).await.unwrap();
        assert_eq!(read.name, "Carol");
        assert_eq!(read.expertise, vec!["Education", "Technology"]);
    }
}
