//! Repository implementations for database access
//!
//! - Row structs map columns, then convert into core types
//! - Listing is by id so pagination is stable
//! - Votes use a transaction for insert + score increment

pub mod entrepreneurs;
pub mod problems;
pub mod votes;

pub use entrepreneurs::EntrepreneurRepo;
pub use problems::ProblemRepo;
pub use votes::VoteRepo;

pub use crate::store::{StoreError as DbError, StoreResult as DbResult};
