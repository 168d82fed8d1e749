//! Route handlers organized by resource

pub mod entrepreneurs;
pub mod export;
pub mod problems;
pub mod reddit;
pub mod root;
pub mod votes;
