//! Catalog client for the contents API.

mod contents;

use crate::config::CatalogClientConfig;
use crate::error::ClientBuildError;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::{GithubConfig, RepoRef};
use url::Url;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default catalog client using the reqwest HTTP backend.
pub type DefaultCatalogClient = GithubCatalogClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for reading the catalog tree of one repository.
///
/// Generic over the HTTP backend for testing. External code uses
/// `DefaultCatalogClient::new()` through the `CatalogSourcePort` trait.
pub struct GithubCatalogClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: GithubConfig,
}

impl DefaultCatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &CatalogClientConfig) -> Result<Self, ClientBuildError> {
        let internal_config = Self::to_internal_config(config)?;
        let backend = ReqwestBackend::new(&internal_config, &config.user_agent, config.timeout)
            .map_err(|e| ClientBuildError::HttpClient(e.to_string()))?;

        Ok(Self {
            backend,
            config: internal_config,
        })
    }

    fn to_internal_config(config: &CatalogClientConfig) -> Result<GithubConfig, ClientBuildError> {
        if config.owner.trim().is_empty() || config.repo.trim().is_empty() {
            return Err(ClientBuildError::MissingRepository);
        }

        let base_url =
            Url::parse(&config.base_url).map_err(|e| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(GithubConfig {
            base_url,
            repo: RepoRef::new(config.owner.trim(), config.repo.trim()),
            git_ref: config.git_ref.clone(),
            per_page: config.per_page,
            token: config.token.clone(),
            max_retries: config.max_retries,
            #[allow(clippy::cast_possible_truncation)] // Duration milliseconds won't exceed u64 in practice
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
        })
    }
}

impl<B: HttpBackend> GithubCatalogClient<B> {
    /// Create a client with a custom backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: GithubConfig, backend: B) -> Self {
        Self { backend, config }
    }

    /// `owner/repo` this client reads from.
    pub fn repository(&self) -> String {
        self.config.repo.id()
    }
}
