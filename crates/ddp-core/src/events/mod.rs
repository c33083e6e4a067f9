//! Canonical event union pushed to presentation layers.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "download_progress", "appId": "Tool", "downloaded": 512, "total": 2048 }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::CatalogEntry;

/// Events emitted by the catalog controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    // ========== Catalog Events ==========
    /// A sync cycle started; listeners should drop entries from earlier cycles.
    CatalogStarted,

    /// One app's manifest is assembled and published.
    ManifestReady {
        /// The published entry with its installed flag.
        entry: CatalogEntry,
    },

    /// An app was left out of the catalog.
    AppSkipped {
        #[serde(rename = "appId")]
        app_id: String,
        message: String,
    },

    /// The catalog root could not be listed.
    CatalogError { message: String },

    /// The sync cycle ended. Emitted exactly once per cycle.
    CatalogFinished {
        /// Manifests published during this cycle.
        published: usize,
        skipped: usize,
        cancelled: bool,
    },

    // ========== Install Events ==========
    /// Byte progress of an app install. `total` is `0` when unknown.
    DownloadProgress {
        #[serde(rename = "appId")]
        app_id: String,
        downloaded: u64,
        total: u64,
    },

    InstallResult {
        #[serde(rename = "appId")]
        app_id: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    UninstallResult {
        #[serde(rename = "appId")]
        app_id: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// A best-effort shortcut step failed; the main operation is unaffected.
    ShortcutWarning {
        #[serde(rename = "appId")]
        app_id: String,
        message: String,
    },
}

impl AppEvent {
    pub fn manifest_ready(entry: CatalogEntry) -> Self {
        Self::ManifestReady { entry }
    }

    pub fn app_skipped(app_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AppSkipped {
            app_id: app_id.into(),
            message: message.into(),
        }
    }

    pub fn catalog_error(message: impl Into<String>) -> Self {
        Self::CatalogError {
            message: message.into(),
        }
    }

    pub const fn catalog_finished(published: usize, skipped: usize, cancelled: bool) -> Self {
        Self::CatalogFinished {
            published,
            skipped,
            cancelled,
        }
    }

    pub fn download_progress(app_id: impl Into<String>, downloaded: u64, total: u64) -> Self {
        Self::DownloadProgress {
            app_id: app_id.into(),
            downloaded,
            total,
        }
    }

    pub fn install_succeeded(app_id: impl Into<String>, path: PathBuf) -> Self {
        Self::InstallResult {
            app_id: app_id.into(),
            success: true,
            path: Some(path),
            error: None,
        }
    }

    pub fn install_failed(app_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::InstallResult {
            app_id: app_id.into(),
            success: false,
            path: None,
            error: Some(error.into()),
        }
    }

    pub fn uninstall_result(app_id: impl Into<String>, error: Option<String>) -> Self {
        Self::UninstallResult {
            app_id: app_id.into(),
            success: error.is_none(),
            error,
        }
    }

    pub fn shortcut_warning(app_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShortcutWarning {
            app_id: app_id.into(),
            message: message.into(),
        }
    }

    /// Get the event name for wire protocols.
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::CatalogStarted => "catalog:started",
            Self::ManifestReady { .. } => "catalog:manifest_ready",
            Self::AppSkipped { .. } => "catalog:app_skipped",
            Self::CatalogError { .. } => "catalog:error",
            Self::CatalogFinished { .. } => "catalog:finished",
            Self::DownloadProgress { .. } => "install:progress",
            Self::InstallResult { .. } => "install:result",
            Self::UninstallResult { .. } => "uninstall:result",
            Self::ShortcutWarning { .. } => "shortcut:warning",
        }
    }
}
