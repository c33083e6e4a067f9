use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::AppManifest;

/// Per-app lifecycle as seen by the controller.
///
/// `Installed` and `NotInstalled` are derived from disk and the OS index;
/// the two transient states only exist while an operation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallState {
    NotInstalled,
    Installing,
    Installed,
    Uninstalling,
}

impl InstallState {
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Installing | Self::Uninstalling)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotInstalled => "not installed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Uninstalling => "uninstalling",
        }
    }
}

impl std::fmt::Display for InstallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an app lives (or would live) locally and whether it counts as installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub app_id: String,
    pub install_dir: PathBuf,
    pub is_installed: bool,
    /// Present only when a shortcut file currently exists.
    pub shortcut_path: Option<PathBuf>,
}

/// A manifest as published by the controller, with its installed flag
/// resolved at the time it was added or last refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub manifest: AppManifest,
    pub installed: bool,
}

impl CatalogEntry {
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }
}
