//! Problem summarization via Google Gemini
//!
//! Direct REST integration with the `generateContent` endpoint. The
//! summarizer never fails: without an API key it answers with a fixed
//! placeholder, and any request or parse failure becomes a fallback
//! analysis whose summary carries the error text.

use std::time::Duration;

use async_trait::async_trait;
use collective_core::{list, Category, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Summary returned when no API key is configured
pub const PLACEHOLDER_SUMMARY: &str =
    "This is a placeholder summary. Configure Gemini API key to enable AI processing.";

/// Leading/trailing markdown code fences, with an optional language tag
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```\s*(json)?|```$").expect("invalid fence regex"));

/// What the summarizer derived from a problem text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub summary: String,
    pub keywords: Vec<String>,
    pub category: Category,
}

impl Analysis {
    /// Fixed result used when the summarizer is not configured.
    pub fn placeholder() -> Self {
        Self {
            summary: PLACEHOLDER_SUMMARY.to_string(),
            keywords: vec!["placeholder".to_string(), "ai".to_string()],
            category: Category::Other,
        }
    }

    /// Result used when a configured summarizer fails.
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            summary: format!("AI processing failed: {}", error),
            keywords: vec!["error".to_string()],
            category: Category::Other,
        }
    }
}

/// Summarize and categorize problem text
#[async_trait]
pub trait Summarizer: Send + Sync + 'static {
    /// Always produces an analysis; failures are folded into the result.
    async fn summarize(&self, text: &str, source: Source) -> Analysis;

    /// Whether a real model backs this summarizer.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Summarizer used when no API key is available
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSummarizer;

#[async_trait]
impl Summarizer for PlaceholderSummarizer {
    async fn summarize(&self, _text: &str, _source: Source) -> Analysis {
        Analysis::placeholder()
    }

    fn is_configured(&self) -> bool {
        false
    }
}

/// Gemini client options
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Model name (default: gemini-pro)
    pub model: String,
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Summarization failure, folded into [`Analysis::failed`]
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("could not parse model output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gemini-backed summarizer
pub struct GeminiSummarizer {
    http: Client,
    config: GeminiConfig,
}

impl GeminiSummarizer {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    async fn try_summarize(&self, text: &str, source: Source) -> Result<Analysis, SummarizerError> {
        #[derive(Serialize)]
        struct GenerateRequest<'a> {
            contents: [Content<'a>; 1],
        }

        #[derive(Serialize)]
        struct Content<'a> {
            parts: [Part<'a>; 1],
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: Option<CandidateContent>,
        }

        #[derive(Deserialize)]
        struct CandidateContent {
            #[serde(default)]
            parts: Vec<CandidatePart>,
        }

        #[derive(Deserialize)]
        struct CandidatePart {
            text: Option<String>,
        }

        let prompt = build_prompt(text, source);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&GenerateRequest {
                contents: [Content {
                    parts: [Part { text: &prompt }],
                }],
            })
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        let raw: String = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .next()
            .ok_or(SummarizerError::EmptyResponse)?;

        debug!(chars = raw.len(), "gemini response received");
        parse_analysis(&raw)
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str, source: Source) -> Analysis {
        match self.try_summarize(text, source).await {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(error = %err, "gemini summarization failed, using fallback");
                Analysis::failed(err)
            }
        }
    }
}

/// Build the fixed prompt sent to the model.
pub fn build_prompt(text: &str, source: Source) -> String {
    format!(
        "Summarize this problem in 3 sentences or less.\n\
         Extract 3-5 keywords as a comma-separated list.\n\
         Categorize it into one of the following: {}.\n\
         Return a single, minified JSON object with three keys: \"summary\", \"keywords\", \"category\".\n\
         \n\
         Problem: \"{}\"\n\
         Source: {}\n",
        Category::prompt_list(),
        text,
        source.as_str()
    )
}

/// Parse model output into an analysis.
///
/// Accepts output wrapped in markdown fences or surrounded by prose,
/// `keywords` as an array or a comma-separated string, and maps unknown
/// categories to `Other`.
pub fn parse_analysis(raw: &str) -> Result<Analysis, SummarizerError> {
    #[derive(Deserialize)]
    struct RawAnalysis {
        summary: String,
        #[serde(default, deserialize_with = "list::lenient")]
        keywords: Vec<String>,
        #[serde(default)]
        category: Option<String>,
    }

    let cleaned = strip_fences(raw);
    let json = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned.as_str(),
    };

    let parsed: RawAnalysis = serde_json::from_str(json)?;
    Ok(Analysis {
        summary: parsed.summary.trim().to_string(),
        keywords: parsed.keywords,
        category: parsed
            .category
            .as_deref()
            .map(Category::from_label_lossy)
            .unwrap_or(Category::Other),
    })
}

fn strip_fences(raw: &str) -> String {
    raw.trim()
        .lines()
        .map(|line| FENCE_RE.replace_all(line.trim(), ""))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
