use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Display name used when an app ships no `name.txt` (or an empty one).
pub const UNKNOWN_APP_NAME: &str = "Unknown App";

/// Extras key shown as the app version in detail views.
pub const VERSION_KEY: &str = "Version";

/// A downloadable file from an app's `Package/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFile {
    pub file_name: String,
    /// Where the bytes can be fetched from (a direct download URL for the
    /// GitHub adapter).
    pub source_locator: String,
    pub size_bytes: u64,
}

/// Everything known about one catalog app.
///
/// Built once per traversal by the manifest assembler and immutable after
/// that. Package files keep the order the remote listing returned them in;
/// the first one is the artifact that gets installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    /// The app's folder name in the catalog. Unique within one catalog.
    pub id: String,
    pub name: String,
    pub description: String,
    pub extras: IndexMap<String, String>,
    pub logo_ref: Option<String>,
    pub banner_ref: Option<String>,
    pub screenshot_refs: Vec<String>,
    pub package_files: Vec<PackageFile>,
}

impl AppManifest {
    /// Create an empty manifest with default display values.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: UNKNOWN_APP_NAME.to_string(),
            description: String::new(),
            extras: IndexMap::new(),
            logo_ref: None,
            banner_ref: None,
            screenshot_refs: Vec::new(),
            package_files: Vec::new(),
        }
    }

    /// The file an install downloads, if any.
    pub fn primary_artifact(&self) -> Option<&PackageFile> {
        self.package_files.first()
    }

    pub fn is_installable(&self) -> bool {
        !self.package_files.is_empty()
    }

    pub fn version(&self) -> Option<&str> {
        self.extras.get(VERSION_KEY).map(String::as_str)
    }

    /// Extras other than the version, in file order.
    pub fn detail_extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extras
            .iter()
            .filter(|(key, _)| key.as_str() != VERSION_KEY)
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Sum of all package file sizes.
    pub fn total_package_bytes(&self) -> u64 {
        self.package_files.iter().map(|f| f.size_bytes).sum()
    }
}
