//! Remote catalog source port.
//!
//! The catalog is a directory tree in a remote repository. Core only ever
//! needs two things from it: a directory listing and the bytes behind a
//! file locator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of an entry in a remote directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, submodules and anything else the source reports.
    Other,
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    /// Path relative to the repository root.
    pub path: String,
    pub kind: EntryKind,
    /// Direct download location, when the source provides one.
    pub download_locator: Option<String>,
    pub size: u64,
}

impl RemoteEntry {
    pub fn file(name: impl Into<String>, path: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            download_locator: None,
            size,
        }
    }

    pub fn directory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
            download_locator: None,
            size: 0,
        }
    }

    #[must_use]
    pub fn with_download_locator(mut self, locator: impl Into<String>) -> Self {
        self.download_locator = Some(locator.into());
        self
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// What to hand to [`CatalogSourcePort::fetch_content`] or a downloader.
    pub fn locator(&self) -> &str {
        self.download_locator.as_deref().unwrap_or(&self.path)
    }
}

/// Domain-facing errors from a catalog source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogPortError {
    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Authentication required for {path}")]
    AuthRequired { path: String },

    #[error("Rate limited by catalog source")]
    RateLimited,

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type CatalogPortResult<T> = Result<T, CatalogPortError>;

/// Read access to the remote catalog tree.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSourcePort: Send + Sync {
    /// List a directory. Entry order is whatever the source returns.
    async fn list_directory(&self, path: &str) -> CatalogPortResult<Vec<RemoteEntry>>;

    /// Fetch the raw bytes behind a locator from a listing.
    async fn fetch_content(&self, locator: &str) -> CatalogPortResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_prefers_download_url() {
        let entry = RemoteEntry::file("a.txt", "Apps/A/Info/a.txt", 3);
        assert_eq!(entry.locator(), "Apps/A/Info/a.txt");
        let entry = entry.with_download_locator("https://raw.test/a.txt");
        assert_eq!(entry.locator(), "https://raw.test/a.txt");
    }

    #[tokio::test]
    async fn mock_source_lists() {
        let mut source = MockCatalogSourcePort::new();
        source
            .expect_list_directory()
            .withf(|path| path == "Apps")
            .returning(|_| Ok(vec![RemoteEntry::directory("A", "Apps/A")]));

        let entries = source.list_directory("Apps").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_directory());
    }
}
