//! Reddit ingestion pipeline
//!
//! Fetches hot self posts, drops those whose exact text is already stored,
//! summarizes the rest one at a time and stores them as Reddit problems.
//! [`IngestJobs`] keeps at most one running job per subreddit.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use collective_core::{NewProblem, ProblemText, Source, SubredditName};
use collective_services::{PostSource, RedditError, RedditPost, Summarizer};
use serde::Serialize;

use crate::store::{Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to fetch posts: {0}")]
    Fetch(#[from] RedditError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome counts of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub fetched: usize,
    pub skipped: usize,
    pub created: usize,
}

/// Text stored for a post: title, blank line, body.
pub fn post_text(post: &RedditPost) -> String {
    if post.selftext.trim().is_empty() {
        post.title.clone()
    } else {
        format!("{}\n\n{}", post.title, post.selftext)
    }
}

fn new_reddit_problem(post: &RedditPost, text: ProblemText) -> NewProblem {
    let mut problem = NewProblem::new(Source::Reddit, text);
    problem.subreddit = Some(post.subreddit.clone());
    problem.author_username = Some(post.author_username.clone());
    problem.author_karma = Some(post.author_karma);
    problem
}

/// Run one ingestion pass for a subreddit.
pub async fn ingest_subreddit(
    store: &dyn Store,
    posts: &dyn PostSource,
    summarizer: &dyn Summarizer,
    subreddit: &SubredditName,
    limit: u32,
) -> Result<IngestReport, IngestError> {
    let fetched = posts.fetch_posts(subreddit.as_str(), limit).await?;
    let mut report = IngestReport {
        fetched: fetched.len(),
        ..IngestReport::default()
    };

    for post in &fetched {
        let text = match ProblemText::new(&post_text(post)) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    post_id = %post.id,
                    error = %err,
                    "post has unusable text, skipping"
                );
                report.skipped += 1;
                continue;
            }
        };

        if store.problem_text_exists(text.as_str()).await? {
            tracing::debug!(post_id = %post.id, "already imported");
            report.skipped += 1;
            continue;
        }

        let analysis = summarizer.summarize(text.as_str(), Source::Reddit).await;

        let mut problem = new_reddit_problem(post, text);
        problem.summary = Some(analysis.summary);
        problem.keywords = analysis.keywords;
        problem.category = Some(analysis.category);
        problem.processed = true;

        let stored = store.create_problem(problem).await?;
        tracing::debug!(post_id = %post.id, problem_id = stored.id, "imported post");
        report.created += 1;
    }

    tracing::info!(
        subreddit = subreddit.as_str(),
        fetched = report.fetched,
        skipped = report.skipped,
        created = report.created,
        "ingestion finished"
    );
    Ok(report)
}

/// Subreddits with a running ingestion job
#[derive(Debug, Clone, Default)]
pub struct IngestJobs {
    running: Arc<Mutex<HashSet<String>>>,
}

impl IngestJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the subreddit. `None` when a job for it is already running.
    ///
    /// The claim is released when the returned guard drops.
    pub fn try_start(&self, subreddit: &SubredditName) -> Option<JobGuard> {
        let key = subreddit.key();
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if !running.insert(key.clone()) {
            return None;
        }
        Some(JobGuard {
            running: Arc::clone(&self.running),
            key,
        })
    }

    pub fn is_running(&self, subreddit: &SubredditName) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&subreddit.key())
    }
}

/// Held by a running job
#[derive(Debug)]
pub struct JobGuard {
    running: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for JobGuard {
    fn drop(&mut self) {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
