//! Schema creation
//!
//! Every statement is idempotent so `run` executes on each startup.

use sqlx::PgPool;

/// Create tables and indexes if they are missing.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("running migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problems (
            id BIGSERIAL PRIMARY KEY,
            source TEXT NOT NULL,
            subreddit TEXT,
            author_username TEXT,
            author_karma BIGINT,
            original_text TEXT NOT NULL,
            summary TEXT,
            keywords TEXT[] NOT NULL DEFAULT '{}',
            category TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            score BIGINT NOT NULL DEFAULT 0,
            processed BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // No foreign key: votes for unknown problems are kept
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id BIGSERIAL PRIMARY KEY,
            problem_id BIGINT NOT NULL,
            user_identifier TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entrepreneurs (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            organization TEXT,
            expertise TEXT[] NOT NULL DEFAULT '{}',
            description TEXT,
            email TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_problems_source ON problems (source)",
        "CREATE INDEX IF NOT EXISTS idx_problems_category ON problems (category)",
        // Texts can exceed the btree row limit, so index the digest
        "CREATE INDEX IF NOT EXISTS idx_problems_text_md5 ON problems (md5(original_text))",
        "CREATE INDEX IF NOT EXISTS idx_votes_problem_id ON votes (problem_id)",
        "CREATE INDEX IF NOT EXISTS idx_entrepreneurs_name ON entrepreneurs (name)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("migrations complete");
    Ok(())
}
