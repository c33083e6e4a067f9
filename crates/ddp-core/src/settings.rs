//! Store settings persisted as JSON in the config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::DEFAULT_NAMESPACE;

/// Default catalog root directory inside the remote repository.
pub const DEFAULT_CATALOG_ROOT: &str = "Apps";

/// Default number of concurrently streaming downloads.
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 4;

/// Default number of apps fetched in parallel during a sync.
pub const DEFAULT_MAX_CONCURRENT_APP_FETCHES: usize = 4;

/// User-tunable store settings.
///
/// Every field is optional in the file; missing values take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Owner of the catalog repository.
    pub owner: Option<String>,
    /// Name of the catalog repository.
    pub repo: Option<String>,
    /// Branch, tag or commit to read. `None` uses the repository default.
    pub git_ref: Option<String>,
    pub catalog_root: String,
    /// Install data root. `None` uses the platform local data directory.
    pub app_data_root: Option<PathBuf>,
    pub namespace: String,
    pub max_concurrent_downloads: usize,
    pub max_concurrent_app_fetches: usize,
    /// Where shortcuts go. `None` uses the user's desktop.
    pub desktop_dir: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            git_ref: None,
            catalog_root: DEFAULT_CATALOG_ROOT.to_string(),
            app_data_root: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
            max_concurrent_app_fetches: DEFAULT_MAX_CONCURRENT_APP_FETCHES,
            desktop_dir: None,
        }
    }
}

impl StoreSettings {
    /// Load from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let settings: Self = serde_json::from_str(&raw).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        validate_settings(&settings)?;
        Ok(settings)
    }

    /// Write to `path`, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        validate_settings(self)?;
        let io_err = |e: std::io::Error| SettingsError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, json).map_err(io_err)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Max concurrent downloads must be between 1 and 8, got {0}")]
    InvalidDownloadConcurrency(usize),

    #[error("Max concurrent app fetches must be between 1 and 16, got {0}")]
    InvalidFetchConcurrency(usize),

    #[error("Catalog root cannot be empty")]
    EmptyCatalogRoot,

    #[error("Namespace must be a single non-empty folder name, got '{0}'")]
    InvalidNamespace(String),

    #[error("Failed to read settings {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Invalid settings file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &StoreSettings) -> Result<(), SettingsError> {
    if !(1..=8).contains(&settings.max_concurrent_downloads) {
        return Err(SettingsError::InvalidDownloadConcurrency(
            settings.max_concurrent_downloads,
        ));
    }

    if !(1..=16).contains(&settings.max_concurrent_app_fetches) {
        return Err(SettingsError::InvalidFetchConcurrency(
            settings.max_concurrent_app_fetches,
        ));
    }

    if settings.catalog_root.trim().is_empty() {
        return Err(SettingsError::EmptyCatalogRoot);
    }

    if !crate::paths::is_plain_file_name(settings.namespace.trim()) {
        return Err(SettingsError::InvalidNamespace(settings.namespace.clone()));
    }

    Ok(())
}
