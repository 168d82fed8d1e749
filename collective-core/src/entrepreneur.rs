//! Entrepreneur profiles

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Maximum length for email addresses
const MAX_EMAIL_LEN: usize = 254;

/// One `@`, something on both sides, no whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("invalid email regex"));

/// Validated contact email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Create an email address, trimming surrounding whitespace.
    ///
    /// # Example
    /// ```
    /// use collective_core::Email;
    ///
    /// assert!(Email::new("contact@solveit.com").is_ok());
    /// assert!(Email::new("not-an-address").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@domain",
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A stored entrepreneur profile
///
/// `email` is kept for contact but never serialized into read responses;
/// the HTTP layer maps to its own response type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entrepreneur {
    pub id: i64,
    pub name: String,
    pub organization: Option<String>,
    pub expertise: Vec<String>,
    pub description: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert an entrepreneur
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntrepreneur {
    pub name: String,
    pub organization: Option<String>,
    pub expertise: Vec<String>,
    pub description: Option<String>,
    pub email: Email,
}
