//! Reddit hot-post fetcher
//!
//! Uses the application-only OAuth flow (client credentials) and the
//! public listing/user endpoints. Only self (text) posts are returned.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default OAuth token endpoint host
pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";

/// Default authenticated API host
pub const DEFAULT_API_URL: &str = "https://oauth.reddit.com";

/// Author name reported for deleted accounts
pub const DELETED_AUTHOR: &str = "N/A";

/// Largest page the listing endpoint serves
const PAGE_SIZE: u32 = 100;

/// Refresh the token this long before Reddit says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A text post pulled from a subreddit listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub created_utc: f64,
    pub score: i64,
    pub subreddit: String,
    /// `"N/A"` when the author account is deleted
    pub author_username: String,
    /// Link plus comment karma, 0 when deleted or unavailable
    pub author_karma: i64,
}

/// Reddit fetch errors
#[derive(Debug, thiserror::Error)]
pub enum RedditError {
    #[error("Reddit API credentials are not configured. Cannot fetch posts.")]
    NotConfigured,

    #[error("reddit request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reddit returned an unexpected payload: {0}")]
    Payload(String),
}

/// Source of subreddit posts
#[async_trait]
pub trait PostSource: Send + Sync + 'static {
    /// Fetch up to `limit` hot posts, keeping text posts only.
    async fn fetch_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, RedditError>;
}

/// Post source used when credentials are missing; every fetch fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPostSource;

#[async_trait]
impl PostSource for UnconfiguredPostSource {
    async fn fetch_posts(
        &self,
        _subreddit: &str,
        _limit: u32,
    ) -> Result<Vec<RedditPost>, RedditError> {
        Err(RedditError::NotConfigured)
    }
}

/// Reddit client credentials and endpoints
#[derive(Debug, Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    /// Token endpoint host, overridable for tests
    pub auth_url: String,
    /// API host, overridable for tests
    pub api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RedditConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: user_agent.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Authenticated Reddit client
pub struct RedditClient {
    http: Client,
    config: RedditConfig,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
    /// Cursor for the next page, absent on the last one
    after: Option<String>,
}

#[derive(Deserialize)]
struct ListingChild {
    data: RawPost,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    subreddit: String,
    author: Option<String>,
    #[serde(default)]
    is_self: bool,
}

impl RawPost {
    /// Author name, or None for deleted accounts
    fn live_author(&self) -> Option<&str> {
        match self.author.as_deref() {
            None | Some("") | Some("[deleted]") => None,
            Some(name) => Some(name),
        }
    }
}

#[derive(Deserialize)]
struct UserAbout {
    data: UserData,
}

#[derive(Deserialize)]
struct UserData {
    #[serde(default)]
    link_karma: i64,
    #[serde(default)]
    comment_karma: i64,
}

impl RedditClient {
    pub fn new(config: RedditConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    /// Get a bearer token, reusing the cached one until shortly before expiry.
    async fn access_token(&self) -> Result<String, RedditError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let url = format!(
            "{}/api/v1/access_token",
            self.config.auth_url.trim_end_matches('/')
        );
        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        debug!(expires_in = response.expires_in, "reddit token refreshed");
        *cached = Some(CachedToken {
            value: response.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(response.access_token)
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn author_karma(&self, token: &str, author: &str) -> Result<i64, RedditError> {
        let about = self
            .http
            .get(self.api(&format!("/user/{}/about", author)))
            .bearer_auth(token)
            .query(&[("raw_json", "1")])
            .send()
            .await?
            .error_for_status()?
            .json::<UserAbout>()
            .await?;

        Ok(about.data.link_karma + about.data.comment_karma)
    }

    /// Walk the hot listing until `limit` entries are seen or it runs out.
    async fn hot_listing(
        &self,
        token: &str,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RawPost>, RedditError> {
        let mut raw_posts = Vec::new();
        let mut after: Option<String> = None;

        while raw_posts.len() < limit as usize {
            let remaining = limit - raw_posts.len() as u32;
            let mut query = vec![
                ("limit", remaining.min(PAGE_SIZE).to_string()),
                ("raw_json", "1".to_string()),
            ];
            if let Some(cursor) = &after {
                query.push(("after", cursor.clone()));
                query.push(("count", raw_posts.len().to_string()));
            }

            let listing = self
                .http
                .get(self.api(&format!("/r/{}/hot", subreddit)))
                .bearer_auth(token)
                .query(&query)
                .send()
                .await?
                .error_for_status()?
                .json::<Listing>()
                .await
                .map_err(|e| RedditError::Payload(e.to_string()))?;

            let page_len = listing.data.children.len();
            raw_posts.extend(listing.data.children.into_iter().map(|child| child.data));

            match listing.data.after {
                Some(cursor) if page_len > 0 => after = Some(cursor),
                _ => break,
            }
        }

        raw_posts.truncate(limit as usize);
        Ok(raw_posts)
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn fetch_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, RedditError> {
        let token = self.access_token().await?;
        let listing = self.hot_listing(&token, subreddit, limit).await?;

        let mut karma_cache: HashMap<String, i64> = HashMap::new();
        let mut posts = Vec::new();

        for raw in listing {
            if !raw.is_self {
                continue;
            }

            let (author_username, author_karma) = match raw.live_author() {
                None => (DELETED_AUTHOR.to_string(), 0),
                Some(name) => {
                    let karma = match karma_cache.get(name).copied() {
                        Some(karma) => karma,
                        None => {
                            let karma = self.author_karma(&token, name).await.unwrap_or_else(|err| {
                                warn!(author = %name, error = %err, "karma lookup failed");
                                0
                            });
                            karma_cache.insert(name.to_string(), karma);
                            karma
                        }
                    };
                    (name.to_string(), karma)
                }
            };

            posts.push(RedditPost {
                id: raw.id,
                title: raw.title,
                selftext: raw.selftext,
                created_utc: raw.created_utc,
                score: raw.score,
                subreddit: raw.subreddit,
                author_username,
                author_karma,
            });
        }

        debug!(subreddit, count = posts.len(), "fetched reddit posts");
        Ok(posts)
    }
}
