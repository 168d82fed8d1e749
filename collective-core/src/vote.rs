//! Vote records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{non_blank, ValidationError};

/// A recorded upvote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub problem_id: i64,
    pub user_identifier: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a vote
///
/// Repeat votes from the same identifier are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub problem_id: i64,
    pub user_identifier: String,
}

impl NewVote {
    pub fn new(problem_id: i64, user_identifier: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            problem_id,
            user_identifier: non_blank("user_identifier", user_identifier)?,
        })
    }
}
