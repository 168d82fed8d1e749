//! Configuration loading
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. `~/.collective/config.toml` (or the path in `COLLECTIVE_CONFIG`)
//! 3. Environment variables, including `.env` files
//! 4. Command-line flags (applied by each command)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use collective_services::{
    GeminiConfig, GeminiSummarizer, PlaceholderSummarizer, PostSource, RedditClient, RedditConfig,
    Summarizer, UnconfiguredPostSource,
};
use serde::Deserialize;
use tracing::{debug, info};

const CONFIG_DIR: &str = ".collective";

/// Load `.env` from the current directory, then `~/.collective/.env`.
///
/// Variables already set are never overwritten.
pub fn load_dotenv() {
    let mut loaded = false;

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded = true;
    }

    if let Some(home) = dirs::home_dir() {
        let env_file = home.join(CONFIG_DIR).join(".env");
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from {}", env_file.display());
                    loaded = true;
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if !loaded {
        debug!("No .env files found (current dir or ~/{CONFIG_DIR})");
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub request_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: collective_server::db::pool::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RedditSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeminiSection {
    pub api_key: Option<String>,
    pub model: String,
    /// Upper bound for one model call; capped below the request timeout
    pub timeout_secs: u64,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            model: collective_services::summarizer::DEFAULT_MODEL.to_string(),
            timeout_secs: 20,
        }
    }
}

/// Service configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollectiveConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub reddit: RedditSection,
    pub gemini: GeminiSection,
}

impl CollectiveConfig {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Config file path: `$COLLECTIVE_CONFIG` or `~/.collective/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("COLLECTIVE_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join("config.toml")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file (invalid TOML): {}", path.display())
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override fields from environment variables looked up through `get`.
    pub fn apply_env<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = non_empty("COLLECTIVE_BIND") {
            self.server.bind = bind
                .parse()
                .with_context(|| format!("COLLECTIVE_BIND is not a socket address: {bind}"))?;
        }
        if let Some(url) = non_empty("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(max) = non_empty("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = max
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {max}"))?;
        }
        if let Some(id) = non_empty("REDDIT_CLIENT_ID") {
            self.reddit.client_id = Some(id);
        }
        if let Some(secret) = non_empty("REDDIT_CLIENT_SECRET") {
            self.reddit.client_secret = Some(secret);
        }
        if let Some(agent) = non_empty("REDDIT_USER_AGENT") {
            self.reddit.user_agent = Some(agent);
        }
        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(model) = non_empty("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(secs) = non_empty("GEMINI_TIMEOUT_SECS") {
            self.gemini.timeout_secs = secs
                .parse()
                .with_context(|| format!("GEMINI_TIMEOUT_SECS is not a number: {secs}"))?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Model call timeout, kept inside the request's summarize budget so a
    /// slow model yields a fallback summary instead of a timed-out request.
    pub fn gemini_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.timeout_secs)
            .min(collective_server::summarize_budget(self.request_timeout()))
    }

    /// Gemini summarizer when a key is configured, placeholder otherwise.
    pub fn summarizer(&self) -> Result<Arc<dyn Summarizer>> {
        match &self.gemini.api_key {
            Some(key) => {
                let mut gemini = GeminiConfig::new(key.clone());
                gemini.model = self.gemini.model.clone();
                gemini.timeout = self.gemini_timeout();
                let client =
                    GeminiSummarizer::new(gemini).context("Failed to build Gemini client")?;
                info!(model = %self.gemini.model, "Gemini summarizer enabled");
                Ok(Arc::new(client))
            }
            None => Ok(Arc::new(PlaceholderSummarizer)),
        }
    }

    /// Reddit client when all credentials are configured.
    pub fn post_source(&self) -> Result<Arc<dyn PostSource>> {
        let reddit = &self.reddit;
        match (&reddit.client_id, &reddit.client_secret, &reddit.user_agent) {
            (Some(id), Some(secret), Some(agent)) => {
                let client = RedditClient::new(RedditConfig::new(id, secret, agent))
                    .context("Failed to build Reddit client")?;
                info!("Reddit client enabled");
                Ok(Arc::new(client))
            }
            _ => {
                info!("Reddit credentials not set, loading from Reddit is disabled");
                Ok(Arc::new(UnconfiguredPostSource))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = CollectiveConfig::default();
        assert_eq!(config.server.bind.port(), 8000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.gemini.model, "gemini-pro");
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
url = "postgres://localhost/collective"

[gemini]
api_key = "from-file"
"#
        )
        .unwrap();

        let config = CollectiveConfig::from_file(file.path()).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/collective"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.server, ServerSection::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nbind = ").unwrap();
        assert!(CollectiveConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = CollectiveConfig::default();
        config.gemini.api_key = Some("from-file".into());

        config
            .apply_env(env(&[
                ("GEMINI_API_KEY", "from-env"),
                ("GEMINI_MODEL", "gemini-1.5-flash"),
                ("COLLECTIVE_BIND", "0.0.0.0:9000"),
                ("DATABASE_MAX_CONNECTIONS", "12"),
                ("REDDIT_CLIENT_ID", ""),
            ]))
            .unwrap();

        assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.database.max_connections, 12);
        assert!(config.reddit.client_id.is_none());
    }

    #[test]
    fn bad_env_values_are_errors() {
        let mut config = CollectiveConfig::default();
        assert!(config.apply_env(env(&[("COLLECTIVE_BIND", "nowhere")])).is_err());
        assert!(config
            .apply_env(env(&[("DATABASE_MAX_CONNECTIONS", "many")]))
            .is_err());
    }

    #[test]
    fn gemini_timeout_stays_below_request_timeout() {
        let mut config = CollectiveConfig::default();
        assert_eq!(config.gemini_timeout(), Duration::from_secs(20));

        config.gemini.timeout_secs = 30;
        assert!(config.gemini_timeout() < config.request_timeout());

        config.server.request_timeout_secs = 4;
        config.apply_env(env(&[("GEMINI_TIMEOUT_SECS", "60")])).unwrap();
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.gemini_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn services_fall_back_without_credentials() {
        let config = CollectiveConfig::default();
        assert!(!config.summarizer().unwrap().is_configured());

        let mut partial = CollectiveConfig::default();
        partial.reddit.client_id = Some("id".into());
        // Missing secret and agent: still unconfigured, no error
        assert!(partial.post_source().is_ok());
    }
}
