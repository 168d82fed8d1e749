//! Demo data for an empty database

use collective_core::{
    Category, Email, NewEntrepreneur, NewProblem, ProblemText, Source, ValidationError,
};

use crate::store::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid seed record: {0}")]
    Invalid(#[from] ValidationError),
}

struct SeedProblem {
    source: Source,
    text: &'static str,
    summary: &'static str,
    keywords: &'static [&'static str],
    category: Category,
    author: &'static str,
    score: i64,
}

struct SeedEntrepreneur {
    name: &'static str,
    organization: &'static str,
    expertise: &'static [&'static str],
    description: &'static str,
    email: &'static str,
}

const PROBLEMS: &[SeedProblem] = &[
    SeedProblem {
        source: Source::Reddit,
        text: "The traffic light at the intersection of Main St and 1st Ave has a very short green light, causing long backups.",
        summary: "A traffic light on a major street has a short green cycle, leading to significant traffic congestion.",
        keywords: &["traffic", "infrastructure", "urban planning"],
        category: Category::Traffic,
        author: "user123",
        score: 128,
    },
    SeedProblem {
        source: Source::User,
        text: "Local parks have a severe littering problem, and there aren't enough trash cans available.",
        summary: "Public parks are suffering from excessive litter due to a lack of trash receptacles.",
        keywords: &["environment", "community", "sanitation"],
        category: Category::Environment,
        author: "anonymous",
        score: 45,
    },
];

const ENTREPRENEURS: &[SeedEntrepreneur] = &[
    SeedEntrepreneur {
        name: "Alice Johnson",
        organization: "SolveIt Innovations",
        expertise: &["Healthcare", "Technology"],
        description: "Focused on developing tech solutions for rural healthcare access.",
        email: "contact@solveit.com",
    },
    SeedEntrepreneur {
        name: "Bob Williams",
        organization: "GreenFuture NGO",
        expertise: &["Environment", "Governance"],
        description: "Advocating for sustainable urban development and green policies.",
        email: "bob.w@greenfuture.org",
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Insert the demo problems and entrepreneurs unconditionally.
pub async fn seed(store: &dyn Store) -> Result<(), SeedError> {
    for p in PROBLEMS {
        let mut new = NewProblem::new(p.source, ProblemText::new(p.text)?);
        new.summary = Some(p.summary.to_owned());
        new.keywords = owned(p.keywords);
        new.category = Some(p.category);
        new.author_username = Some(p.author.to_owned());
        new.score = p.score;
        new.processed = true;
        store.create_problem(new).await?;
    }

    for e in ENTREPRENEURS {
        store
            .create_entrepreneur(NewEntrepreneur {
                name: e.name.to_owned(),
                organization: Some(e.organization.to_owned()),
                expertise: owned(e.expertise),
                description: Some(e.description.to_owned()),
                email: Email::new(e.email)?,
            })
            .await?;
    }

    tracing::info!(
        problems = PROBLEMS.len(),
        entrepreneurs = ENTREPRENEURS.len(),
        "seeded demo data"
    );
    Ok(())
}

/// Seed only when no problems are stored yet. Returns whether it seeded.
pub async fn seed_if_empty(store: &dyn Store) -> Result<bool, SeedError> {
    if store.count_problems().await? > 0 {
        tracing::debug!("problems present, skipping seed");
        return Ok(false);
    }
    seed(store).await?;
    Ok(true)
}
