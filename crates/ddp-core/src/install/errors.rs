use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::download::DownloadError;

/// Errors from the install state machine.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum InstallError {
    #[error("App '{app_id}' is not in the catalog")]
    UnknownApp { app_id: String },

    #[error("App '{app_id}' has no package files")]
    NoInstallableArtifact { app_id: String },

    #[error("Could not create install directory {path}: {reason}")]
    DirectoryCreateFailed { path: String, reason: String },

    #[error("Install of '{app_id}' failed: {cause}")]
    InstallFailed { app_id: String, cause: DownloadError },

    #[error("App '{app_id}' is not installed")]
    NotInstalled { app_id: String },

    #[error("Uninstall of '{app_id}' failed: {reason}")]
    UninstallFailed { app_id: String, reason: String },

    #[error("Shortcut for '{app_id}' failed: {reason}")]
    ShortcutFailed { app_id: String, reason: String },

    /// Another operation on this app is in flight.
    #[error("App '{app_id}' is busy: {state}")]
    Busy { app_id: String, state: String },
}

impl InstallError {
    pub fn app_id(&self) -> Option<&str> {
        match self {
            Self::UnknownApp { app_id }
            | Self::NoInstallableArtifact { app_id }
            | Self::InstallFailed { app_id, .. }
            | Self::NotInstalled { app_id }
            | Self::UninstallFailed { app_id, .. }
            | Self::ShortcutFailed { app_id, .. }
            | Self::Busy { app_id, .. } => Some(app_id),
            Self::DirectoryCreateFailed { .. } => None,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::InstallFailed {
                cause: DownloadError::Cancelled,
                ..
            }
        )
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownApp { app_id } => format!("No app called '{app_id}' in the catalog."),
            Self::NoInstallableArtifact { .. } => {
                "This app has no downloadable package. Unavailable.".to_string()
            }
            Self::DirectoryCreateFailed { path, reason } => {
                format!("Could not create {path}: {reason}")
            }
            Self::InstallFailed { cause, .. } => format!("Install failed. {}", cause.user_message()),
            Self::NotInstalled { app_id } => format!("'{app_id}' is not installed."),
            Self::UninstallFailed { reason, .. } => format!("Uninstall failed: {reason}"),
            Self::ShortcutFailed { reason, .. } => {
                format!("The app was installed but no shortcut was created: {reason}")
            }
            Self::Busy { app_id, state } => format!("'{app_id}' is {state}. Try again later."),
        }
    }
}

pub type InstallResult<T> = Result<T, InstallError>;
