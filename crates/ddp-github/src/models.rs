//! Internal API types for the contents endpoint.
//!
//! These never leave the crate; core sees `ddp_core::RemoteEntry`.

use serde::Deserialize;
use url::Url;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration for the catalog client.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API base URL (default: <https://api.github.com>)
    pub base_url: Url,
    /// Repository the catalog lives in
    pub repo: RepoRef,
    /// Branch, tag or commit to read
    pub git_ref: Option<String>,
    /// Listing page size
    pub per_page: u8,
    /// Optional bearer token
    pub token: Option<String>,
    /// Maximum number of retry attempts for transient errors (default: 3)
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff (default: 500)
    pub retry_base_delay_ms: u64,
}

// ============================================================================
// Repository Reference
// ============================================================================

/// Reference to a repository on the API host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

// ============================================================================
// Contents API entries
// ============================================================================

/// Entry type as reported by the contents endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentsEntryType {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Unknown,
}

/// One element of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: ContentsEntryType,
    #[serde(default)]
    pub size: u64,
    /// Absent for directories and submodules.
    #[serde(default)]
    pub download_url: Option<String>,
}
