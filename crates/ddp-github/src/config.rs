//! Public configuration for the catalog client.
//!
//! The internal config (`models::GithubConfig`) is derived from this at
//! construction time.

use std::time::Duration;

/// Default REST API host.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Configuration for the GitHub catalog client.
///
/// # Example
///
/// ```
/// use ddp_github::CatalogClientConfig;
/// use std::time::Duration;
///
/// let config = CatalogClientConfig::new("my-org", "app-catalog")
///     .with_git_ref("stable")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL of the REST API
    pub(crate) base_url: String,
    /// Repository owner (user or organisation)
    pub(crate) owner: String,
    /// Repository name
    pub(crate) repo: String,
    /// Branch, tag or commit; `None` uses the repository default branch
    pub(crate) git_ref: Option<String>,
    /// User agent string (the API rejects requests without one)
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Optional bearer token for private repositories and higher rate limits
    pub(crate) token: Option<String>,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
    /// Entries requested per listing page
    pub(crate) per_page: u8,
}

impl CatalogClientConfig {
    /// Create a configuration for `owner/repo` with default settings.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            owner: owner.into(),
            repo: repo.into(),
            git_ref: None,
            user_agent: concat!("ddp-github/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            per_page: 100,
        }
    }

    /// Set the base URL of the REST API.
    ///
    /// Defaults to `https://api.github.com`.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Pin listings and content to a branch, tag or commit.
    #[must_use]
    pub fn with_git_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    /// Set an optional git ref.
    #[must_use]
    pub fn with_optional_git_ref(mut self, git_ref: Option<String>) -> Self {
        self.git_ref = git_ref.filter(|r| !r.trim().is_empty());
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an authentication token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional authentication token. Blank tokens are ignored.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the listing page size (clamped to 1..=100 by the API).
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// `owner/repo`, for logs and messages.
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogClientConfig::new("org", "catalog");
        assert_eq!(config.base_url, "https://api.github.com");
        assert!(config.user_agent.contains("ddp-github"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.token.is_none());
        assert!(config.git_ref.is_none());
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_base_delay, Duration::from_millis(500));
        assert_eq!(config.per_page, 100);
        assert_eq!(config.repository(), "org/catalog");
    }

    #[test]
    fn test_builder_pattern() {
        let config = CatalogClientConfig::new("org", "catalog")
            .with_base_url("https://ghe.example.com/api/v3")
            .with_git_ref("release")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(60))
            .with_token("secret")
            .with_max_retries(5)
            .with_per_page(50);

        assert_eq!(config.base_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.git_ref.as_deref(), Some("release"));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.per_page, 50);
    }

    #[test]
    fn test_optional_values_ignore_blanks() {
        let config = CatalogClientConfig::new("o", "r")
            .with_optional_token(Some("  ".to_string()))
            .with_optional_git_ref(Some(String::new()));
        assert!(config.token.is_none());
        assert!(config.git_ref.is_none());

        let config = CatalogClientConfig::new("o", "r")
            .with_optional_token(Some("tok".to_string()))
            .with_optional_git_ref(Some("dev".to_string()));
        assert_eq!(config.token.as_deref(), Some("tok"));
        assert_eq!(config.git_ref.as_deref(), Some("dev"));
    }
}
