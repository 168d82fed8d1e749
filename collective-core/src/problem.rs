//! Problem records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Category, ValidationError};

/// Maximum problem text length in characters, above Reddit's self post
/// limit (300 character title plus 40,000 character body)
const MAX_TEXT_LEN: usize = 65536;

/// Where a problem report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Reddit,
    User,
}

impl Source {
    /// Get the origin tag as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reddit => "Reddit",
            Self::User => "User",
        }
    }
}

/// Validated problem text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemText(String);

impl ProblemText {
    /// Create problem text.
    ///
    /// # Rules
    /// - Non-empty after trimming whitespace
    /// - At most 65,536 characters (not bytes)
    ///
    /// The text is kept as given (not trimmed), since ingestion
    /// de-duplicates on the exact stored text.
    ///
    /// # Example
    /// ```
    /// use collective_core::ProblemText;
    ///
    /// assert!(ProblemText::new("Potholes on Elm Street").is_ok());
    /// assert!(ProblemText::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }

        if s.len() > MAX_TEXT_LEN && s.chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::TooLong {
                field: "text",
                max: MAX_TEXT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProblemText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A stored problem report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub source: String,
    pub subreddit: Option<String>,
    pub author_username: Option<String>,
    pub author_karma: Option<i64>,
    pub original_text: String,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub score: i64,
    pub processed: bool,
}

/// Fields needed to insert a problem
#[derive(Debug, Clone, PartialEq)]
pub struct NewProblem {
    pub source: Source,
    pub original_text: ProblemText,
    pub subreddit: Option<String>,
    pub author_username: Option<String>,
    pub author_karma: Option<i64>,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    pub category: Option<Category>,
    pub score: i64,
    pub processed: bool,
}

impl NewProblem {
    /// Start a new, unprocessed problem with score 0 and nothing derived yet.
    pub fn new(source: Source, original_text: ProblemText) -> Self {
        Self {
            source,
            original_text,
            subreddit: None,
            author_username: None,
            author_karma: None,
            summary: None,
            keywords: Vec::new(),
            category: None,
            score: 0,
            processed: false,
        }
    }
}
