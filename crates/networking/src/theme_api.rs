//! HTTP theme resolver
//!
//! Fetches the theme map from `GET <base>/api/themes`. Server errors and
//! transport failures are retried with exponential backoff until the retry
//! budget runs out; client errors and malformed bodies fail immediately.

use app_core::catalog::ThemeMap;
use app_core::resolver::{ResolveError, ThemeResolver};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::Client;
use std::time::Duration;

/// Path of the theme map endpoint
pub const DEFAULT_THEMES_PATH: &str = "/api/themes";

/// Configuration for [`HttpThemeResolver`]
#[derive(Debug, Clone)]
pub struct ThemeApiConfig {
    /// Site origin (e.g., "https://presence.example")
    pub base_url: String,
    /// Endpoint path
    pub path: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delay before the first retry
    pub initial_retry_delay: Duration,
    /// Upper bound on a single retry delay
    pub max_retry_delay: Duration,
    /// Total time spent retrying before giving up
    pub retry_budget: Duration,
    /// User agent string
    pub user_agent: String,
}

impl ThemeApiConfig {
    /// Create a config for the given origin
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: DEFAULT_THEMES_PATH.to_string(),
            timeout: Duration::from_secs(10),
            initial_retry_delay: Duration::from_millis(100),
            max_retry_delay: Duration::from_secs(2),
            retry_budget: Duration::from_secs(5),
            user_agent: format!("Presence/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the endpoint path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the delay before the first retry
    pub fn with_initial_retry_delay(mut self, delay: Duration) -> Self {
        self.initial_retry_delay = delay;
        self
    }

    /// Set the maximum single retry delay
    pub fn with_max_retry_delay(mut self, delay: Duration) -> Self {
        self.max_retry_delay = delay;
        self
    }

    /// Set the total retry budget; zero disables retries
    pub fn with_retry_budget(mut self, budget: Duration) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full endpoint URL
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Theme resolver backed by the site's theme endpoint
#[derive(Debug, Clone)]
pub struct HttpThemeResolver {
    client: Client,
    config: ThemeApiConfig,
}

impl HttpThemeResolver {
    /// Build a resolver
    pub fn new(config: ThemeApiConfig) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ResolveError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ThemeApiConfig {
        &self.config
    }

    async fn fetch_once(&self, url: &str) -> Result<ThemeMap, backoff::Error<ResolveError>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::debug!(url = %url, error = %e, "theme request failed");
            backoff::Error::transient(ResolveError::Transport(e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = ResolveError::Status { status: status.as_u16(), url: url.to_string() };
            return Err(if status.is_server_error() {
                tracing::debug!(url = %url, status = status.as_u16(), "retrying theme request");
                backoff::Error::transient(err)
            } else {
                backoff::Error::permanent(err)
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| backoff::Error::transient(ResolveError::Transport(e.to_string())))?;

        ThemeMap::from_json(&body).map_err(|e| backoff::Error::permanent(ResolveError::from(e)))
    }
}

#[async_trait]
impl ThemeResolver for HttpThemeResolver {
    async fn fetch_themes(&self) -> Result<ThemeMap, ResolveError> {
        let url = self.config.url();
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.config.initial_retry_delay)
            .with_max_interval(self.config.max_retry_delay)
            .with_max_elapsed_time(Some(self.config.retry_budget))
            .build();

        let themes = backoff::future::retry(policy, || self.fetch_once(&url)).await?;
        tracing::debug!(url = %url, themes = themes.len(), "fetched theme map");
        Ok(themes)
    }
}
