//! Internal error types for catalog API operations.
//!
//! `GithubError` never leaves this crate: the port implementation maps it to
//! `ddp_core::CatalogPortError`. `ClientBuildError` is the only public error
//! and covers client construction.

use thiserror::Error;

/// Result type alias for catalog API operations.
pub type GithubResult<T> = Result<T, GithubError>;

/// Errors from talking to the contents API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// API request failed with an HTTP error status.
    #[error("Catalog API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from catalog API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Errors raised while building a [`crate::DefaultCatalogClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Catalog repository is not configured (owner and repo are required)")]
    MissingRepository,

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}
