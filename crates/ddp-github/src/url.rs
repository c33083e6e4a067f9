//! URL construction helpers for the contents API.
//!
//! Pure functions, so every request is built the same way.

use crate::error::GithubResult;
use crate::models::GithubConfig;
use url::{ParseError, Url};

/// Build the contents URL for a repository path, pinned to the configured ref.
///
/// Path segments are percent-encoded individually; empty segments are dropped
/// so `""`, `"/"` and `"Apps/"` all behave.
pub fn build_contents_url(config: &GithubConfig, path: &str) -> GithubResult<Url> {
    let mut url = config.base_url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| ParseError::RelativeUrlWithCannotBeABaseBase)?;
        segments.pop_if_empty();
        segments.extend([
            "repos",
            config.repo.owner.as_str(),
            config.repo.name.as_str(),
            "contents",
        ]);
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
    }

    if let Some(ref git_ref) = config.git_ref {
        url.query_pairs_mut().append_pair("ref", git_ref);
    }

    Ok(url)
}

/// Build the first-page URL for a directory listing.
pub fn build_listing_url(config: &GithubConfig, path: &str) -> GithubResult<Url> {
    let mut url = build_contents_url(config, path)?;
    url.query_pairs_mut()
        .append_pair("per_page", &config.per_page.clamp(1, 100).to_string());
    Ok(url)
}

/// Turn a locator from a listing into a fetchable URL.
///
/// Absolute `http(s)` locators (the entry's `download_url`) are used as-is;
/// anything else is treated as a repository path.
pub fn resolve_content_url(config: &GithubConfig, locator: &str) -> GithubResult<Url> {
    if locator.starts_with("https://") || locator.starts_with("http://") {
        return Ok(Url::parse(locator)?);
    }
    build_contents_url(config, locator)
}

/// Extract the `rel="next"` target from a `Link` header.
pub fn parse_next_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| matches!(p.trim(), "rel=\"next\"" | "rel=next"));
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}
