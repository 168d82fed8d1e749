//! Request and response shapes
//!
//! Read responses never carry an entrepreneur's email. Timestamps are
//! RFC 3339 strings.

use collective_core::{list, Category, Entrepreneur, Problem, Vote};
use serde::{Deserialize, Serialize};

/// Author recorded when a submission names nobody
pub const ANONYMOUS: &str = "anonymous";

/// Default number of posts per Reddit load
pub const DEFAULT_LOAD_LIMIT: u32 = 10;

/// Problem response
#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub id: i64,
    pub source: String,
    pub original_text: String,
    pub subreddit: Option<String>,
    pub author_username: Option<String>,
    pub author_karma: Option<i64>,
    pub summary: Option<String>,
    pub category: Option<Category>,
    pub score: i64,
    pub processed: bool,
    pub keywords: Vec<String>,
    pub created_at: String,
}

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self {
            id: p.id,
            source: p.source,
            original_text: p.original_text,
            subreddit: p.subreddit,
            author_username: p.author_username,
            author_karma: p.author_karma,
            summary: p.summary,
            category: p.category,
            score: p.score,
            processed: p.processed,
            keywords: p.keywords,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Entrepreneur response (no email)
#[derive(Debug, Serialize)]
pub struct EntrepreneurResponse {
    pub id: i64,
    pub name: String,
    pub organization: Option<String>,
    pub description: Option<String>,
    pub expertise: Vec<String>,
    pub created_at: String,
}

impl From<Entrepreneur> for EntrepreneurResponse {
    fn from(e: Entrepreneur) -> Self {
        Self {
            id: e.id,
            name: e.name,
            organization: e.organization,
            description: e.description,
            expertise: e.expertise,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

/// Vote response
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub id: i64,
    pub problem_id: i64,
    pub user_identifier: String,
    pub created_at: String,
}

impl From<Vote> for VoteResponse {
    fn from(v: Vote) -> Self {
        Self {
            id: v.id,
            problem_id: v.problem_id,
            user_identifier: v.user_identifier,
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// Plain `{message}` acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Submit problem request
#[derive(Debug, Deserialize)]
pub struct SubmitProblemRequest {
    pub text: String,
    #[serde(default)]
    pub user: Option<String>,
}

impl SubmitProblemRequest {
    /// Submitting user, `anonymous` when absent or blank.
    pub fn author(&self) -> String {
        self.user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_owned()
    }
}

/// Reddit load request
#[derive(Debug, Deserialize)]
pub struct LoadRedditRequest {
    pub subreddit: String,
    #[serde(default = "default_load_limit")]
    pub limit: u32,
}

fn default_load_limit() -> u32 {
    DEFAULT_LOAD_LIMIT
}

/// Vote request
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub problem_id: i64,
    pub user_identifier: String,
}

/// Create entrepreneur request
///
/// `expertise` may be a JSON array or one comma-separated string.
#[derive(Debug, Deserialize)]
pub struct CreateEntrepreneurRequest {
    pub name: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "list::lenient")]
    pub expertise: Vec<String>,
    pub email: String,
}

/// Trim an optional text field, treating blank as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
