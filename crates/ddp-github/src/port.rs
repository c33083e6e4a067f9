//! Port trait implementation for `GithubCatalogClient`.
//!
//! Implements the core-owned `CatalogSourcePort`, converting internal errors
//! into `CatalogPortError` so core never sees transport types.

use async_trait::async_trait;
use ddp_core::ports::{CatalogPortError, CatalogPortResult, CatalogSourcePort, RemoteEntry};

use crate::client::GithubCatalogClient;
use crate::error::GithubError;
use crate::http::HttpBackend;
use crate::parsing::to_remote_entry;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `GithubError` to core `CatalogPortError`.
fn map_error(err: GithubError, path: &str) -> CatalogPortError {
    match err {
        GithubError::ApiRequestFailed { status, url } => match status {
            404 => CatalogPortError::NotFound {
                path: path.to_string(),
            },
            401 | 403 => CatalogPortError::AuthRequired {
                path: path.to_string(),
            },
            429 => CatalogPortError::RateLimited,
            _ => CatalogPortError::Status { status, url },
        },
        GithubError::InvalidResponse { message } => CatalogPortError::InvalidResponse { message },
        GithubError::Network(e) => CatalogPortError::Network {
            message: e.to_string(),
        },
        GithubError::InvalidUrl(e) => CatalogPortError::Configuration {
            message: e.to_string(),
        },
        GithubError::JsonParse(e) => CatalogPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> CatalogSourcePort for GithubCatalogClient<B> {
    async fn list_directory(&self, path: &str) -> CatalogPortResult<Vec<RemoteEntry>> {
        let entries = self
            .list_contents(path)
            .await
            .map_err(|e| map_error(e, path))?;

        Ok(entries.into_iter().map(to_remote_entry).collect())
    }

    async fn fetch_content(&self, locator: &str) -> CatalogPortResult<Vec<u8>> {
        self.fetch_raw(locator)
            .await
            .map_err(|e| map_error(e, locator))
    }
}
