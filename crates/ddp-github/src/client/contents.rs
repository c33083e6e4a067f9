//! Directory listing and content retrieval.

use crate::error::{GithubError, GithubResult};
use crate::http::HttpBackend;
use crate::models::ContentsEntry;
use crate::parsing::parse_listing_page;
use crate::url::{build_listing_url, resolve_content_url};
use tracing::{debug, warn};

use super::GithubCatalogClient;

/// Upper bound on followed `next` links for one listing.
const MAX_PAGES: usize = 100;

impl<B: HttpBackend> GithubCatalogClient<B> {
    /// List a directory, following pagination until exhausted.
    ///
    /// Pages are concatenated in the order the API returns them.
    pub(crate) async fn list_contents(&self, path: &str) -> GithubResult<Vec<ContentsEntry>> {
        let mut url = build_listing_url(&self.config, path)?;
        let mut entries = Vec::new();

        for page in 1..=MAX_PAGES {
            let (json, next): (serde_json::Value, _) = self.backend.get_json_page(&url).await?;
            entries.extend(parse_listing_page(json)?);

            match next {
                Some(next_url) => {
                    debug!(path, page, "Following listing pagination");
                    url = next_url;
                }
                None => return Ok(entries),
            }
        }

        warn!(path, max_pages = MAX_PAGES, "Listing pagination did not terminate");
        Err(GithubError::InvalidResponse {
            message: format!("listing of '{path}' exceeded {MAX_PAGES} pages"),
        })
    }

    /// Fetch the raw bytes behind a listing locator.
    pub(crate) async fn fetch_raw(&self, locator: &str) -> GithubResult<Vec<u8>> {
        let url = resolve_content_url(&self.config, locator)?;
        self.backend.get_bytes(&url).await
    }
}
