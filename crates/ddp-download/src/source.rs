//! Byte sources a download can stream from.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use ddp_core::download::DownloadError;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::header::AUTHORIZATION;
use url::Url;

/// Chunks of a response body.
pub type ByteStream = BoxStream<'static, Result<Bytes, DownloadError>>;

/// An opened remote body.
pub struct RemoteBody {
    /// Length advertised by the server, if any.
    pub total: Option<u64>,
    pub stream: ByteStream,
}

/// Opens a locator for streaming.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn open(&self, locator: &str) -> Result<RemoteBody, DownloadError>;
}

/// HTTP(S) byte source backed by reqwest.
///
/// There is no overall request timeout (artifacts can be large); only the
/// connection phase is bounded.
pub struct ReqwestSource {
    client: reqwest::Client,
    auth: Option<(String, String)>,
}

impl ReqwestSource {
    pub fn new(user_agent: &str) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DownloadError::other(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, auth: None })
    }

    /// Send `token` as a bearer credential, but only to `host`.
    #[must_use]
    pub fn with_token_for_host(mut self, host: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth = Some((host.into(), token.into()));
        self
    }
}

fn network_error(err: &reqwest::Error) -> DownloadError {
    err.status().map_or_else(
        || DownloadError::network(err.to_string()),
        |status| DownloadError::network_with_status(err.to_string(), status.as_u16()),
    )
}

#[async_trait]
impl ByteSource for ReqwestSource {
    async fn open(&self, locator: &str) -> Result<RemoteBody, DownloadError> {
        let url = Url::parse(locator)
            .map_err(|e| DownloadError::other(format!("Invalid download URL '{locator}': {e}")))?;

        let mut request = self.client.get(url.clone());
        if let Some((ref host, ref token)) = self.auth {
            if url.host_str() == Some(host.as_str()) {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let response = request.send().await.map_err(|e| network_error(&e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::network_with_status(
                format!("HTTP {status} from {url}"),
                status.as_u16(),
            ));
        }

        let total = response.content_length();
        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| network_error(&e)))
            .boxed();

        Ok(RemoteBody { total, stream })
    }
}
