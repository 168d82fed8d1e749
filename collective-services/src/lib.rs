//! collective-services: external integrations
//!
//! - `reddit`: hot-post fetcher using Reddit's application-only OAuth flow
//! - `summarizer`: Gemini-backed summary/keyword/category extraction
//!
//! Both are exposed as capability traits so the server can hold a
//! configured client, a degraded fallback, or a test fake behind the
//! same `Arc<dyn ...>`.

pub mod reddit;
pub mod summarizer;

pub use reddit::{
    PostSource, RedditClient, RedditConfig, RedditError, RedditPost, UnconfiguredPostSource,
};
pub use summarizer::{Analysis, GeminiConfig, GeminiSummarizer, PlaceholderSummarizer, Summarizer};
