//! Subreddit name validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Reddit community names: 2-21 letters, digits or underscores.
/// An `r/` prefix is tolerated and stripped.
static SUBREDDIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{2,21}$").expect("invalid subreddit regex"));

/// Validated subreddit name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubredditName(String);

impl SubredditName {
    /// Create a subreddit name.
    ///
    /// # Example
    /// ```
    /// use collective_core::SubredditName;
    ///
    /// assert_eq!(SubredditName::new("r/CityPlanning").unwrap().as_str(), "CityPlanning");
    /// assert!(SubredditName::new("no spaces").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("/r/")
            .or_else(|| trimmed.strip_prefix("r/"))
            .unwrap_or(trimmed);

        if name.is_empty() {
            return Err(ValidationError::Empty { field: "subreddit" });
        }

        if !SUBREDDIT_RE.is_match(name) {
            return Err(ValidationError::InvalidFormat {
                field: "subreddit",
                reason: "must be 2-21 letters, digits or underscores",
            });
        }

        Ok(Self(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased key, since Reddit treats names case-insensitively.
    pub fn key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl AsRef<str> for SubredditName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
