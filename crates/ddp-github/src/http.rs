//! HTTP backend abstraction for the contents API.
//!
//! Trait-based so the client can be tested against canned responses. The
//! production implementation uses reqwest with retry for transient errors.

use crate::error::{GithubError, GithubResult};
use crate::models::GithubConfig;
use crate::url::parse_next_link;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::{Origin, Url};

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends used by the catalog client.
///
/// This is an implementation detail - external code should use the
/// `CatalogSourcePort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch one page of JSON, returning the `rel="next"` URL if there is one.
    async fn get_json_page<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
    ) -> GithubResult<(T, Option<Url>)>;

    /// Fetch raw bytes.
    async fn get_bytes(&self, url: &Url) -> GithubResult<Vec<u8>>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors. The bearer token is only sent to the API origin,
/// never to third-party `download_url` hosts.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
    auth_token: Option<String>,
    api_origin: Origin,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &GithubConfig, user_agent: &str, timeout: Duration) -> GithubResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
            auth_token: config.token.clone(),
            api_origin: config.base_url.origin(),
        })
    }

    fn is_api_origin(&self, url: &Url) -> bool {
        url.origin() == self.api_origin
    }

    /// Build a request, attaching credentials only for the API origin.
    fn build_request(&self, url: &Url, accept: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str()).header(ACCEPT, accept);
        if let Some(ref token) = self.auth_token {
            if self.is_api_origin(url) {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }
        request
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url, accept: &str) -> GithubResult<reqwest::Response> {
        let mut last_error: Option<GithubError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay_ms = self
                    .retry_base_delay_ms
                    .saturating_mul(2u64.saturating_pow(u32::from(attempt) - 1));
                debug!(url = %url, attempt, delay_ms, "Retrying catalog request");
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            match self.build_request(url, accept).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        last_error = Some(GithubError::ApiRequestFailed {
                            status: status.as_u16(),
                            url: url.to_string(),
                        });
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(GithubError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        last_error = Some(e.into());
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GithubError::InvalidResponse {
            message: "Unknown error during fetch".to_string(),
        }))
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json_page<T: DeserializeOwned + Send>(
        &self,
        url: &Url,
    ) -> GithubResult<(T, Option<Url>)> {
        let response = self.fetch_with_retry(url, JSON_MEDIA_TYPE).await?;

        let next = response
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_next_link);

        let data: T = response.json().await?;
        Ok((data, next))
    }

    async fn get_bytes(&self, url: &Url) -> GithubResult<Vec<u8>> {
        let accept = if self.is_api_origin(url) {
            RAW_MEDIA_TYPE
        } else {
            "*/*"
        };
        let response = self.fetch_with_retry(url, accept).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub enum CannedResponse {
        /// A JSON page, optionally pointing at the next page.
        Json {
            json: serde_json::Value,
            next: Option<String>,
        },
        /// Raw file content.
        Bytes(Vec<u8>),
        /// A non-success HTTP status.
        Status(u16),
    }

    impl CannedResponse {
        pub fn json(json: serde_json::Value) -> Self {
            Self::Json { json, next: None }
        }

        pub fn page(json: serde_json::Value, next: &str) -> Self {
            Self::Json {
                json,
                next: Some(next.to_string()),
            }
        }
    }

    /// A fake HTTP backend that returns canned responses.
    ///
    /// When several patterns match a URL the longest one wins, so page URLs
    /// can be told apart from their first page.
    pub struct FakeBackend {
        responses: Arc<Mutex<Vec<(String, CannedResponse)>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self {
                responses: Arc::new(Mutex::new(Vec::new())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Add a canned response for a URL pattern.
        pub fn with_response(self, url_contains: &str, response: CannedResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push((url_contains.to_string(), response));
            self
        }

        /// URLs requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn find_response(&self, url: &Url) -> GithubResult<CannedResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            let responses = self.responses.lock().unwrap();
            responses
                .iter()
                .filter(|(pattern, _)| url.as_str().contains(pattern.as_str()))
                .max_by_key(|(pattern, _)| pattern.len())
                .map(|(_, response)| response.clone())
                .ok_or_else(|| GithubError::ApiRequestFailed {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    fn status_error(status: u16, url: &Url) -> GithubError {
        GithubError::ApiRequestFailed {
            status,
            url: url.to_string(),
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json_page<T: DeserializeOwned + Send>(
            &self,
            url: &Url,
        ) -> GithubResult<(T, Option<Url>)> {
            match self.find_response(url)? {
                CannedResponse::Json { json, next } => {
                    let data: T = serde_json::from_value(json)?;
                    let next = next.map(|n| Url::parse(&n)).transpose()?;
                    Ok((data, next))
                }
                CannedResponse::Bytes(bytes) => Ok((serde_json::from_slice(&bytes)?, None)),
                CannedResponse::Status(status) => Err(status_error(status, url)),
            }
        }

        async fn get_bytes(&self, url: &Url) -> GithubResult<Vec<u8>> {
            match self.find_response(url)? {
                CannedResponse::Bytes(bytes) => Ok(bytes),
                CannedResponse::Json { json, .. } => Ok(serde_json::to_vec(&json)?),
                CannedResponse::Status(status) => Err(status_error(status, url)),
            }
        }
    }
}
