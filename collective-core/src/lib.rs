//! collective-core: shared domain types for the Collective Problems API
//!
//! Problems, entrepreneurs and votes as the server stores and returns them,
//! plus the comma-separated list codec and input validation used at the
//! edges where list fields arrive as a single string.

pub mod category;
pub mod entrepreneur;
pub mod list;
pub mod problem;
pub mod subreddit;
pub mod validation;
pub mod vote;

pub use category::Category;
pub use entrepreneur::{Email, Entrepreneur, NewEntrepreneur};
pub use problem::{NewProblem, Problem, ProblemText, Source};
pub use subreddit::SubredditName;
pub use validation::{non_blank, ValidationError};
pub use vote::{NewVote, Vote};
