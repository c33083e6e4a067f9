//! Port for desktop shortcut artifacts.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("No desktop directory could be determined")]
    NoDesktopDir,

    #[error("Shortcut I/O failed for {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Shortcut helper failed: {message}")]
    CommandFailed { message: String },
}

/// Creates and removes desktop shortcuts named after an app.
#[cfg_attr(test, mockall::automock)]
pub trait ShortcutPort: Send + Sync {
    /// Where the shortcut for `app_name` lives, whether or not it exists.
    fn shortcut_path(&self, app_name: &str) -> Option<PathBuf>;

    /// Create (or overwrite) a shortcut pointing at `target`.
    fn create(&self, app_name: &str, target: &Path) -> Result<PathBuf, ShortcutError>;

    /// Remove the shortcut. `Ok(false)` when there was nothing to remove.
    fn remove(&self, app_name: &str) -> Result<bool, ShortcutError>;
}

/// A shortcut port for contexts without a desktop.
#[derive(Debug, Clone, Default)]
pub struct NoopShortcuts;

impl ShortcutPort for NoopShortcuts {
    fn shortcut_path(&self, _app_name: &str) -> Option<PathBuf> {
        None
    }

    fn create(&self, _app_name: &str, _target: &Path) -> Result<PathBuf, ShortcutError> {
        Err(ShortcutError::NoDesktopDir)
    }

    fn remove(&self, _app_name: &str) -> Result<bool, ShortcutError> {
        Ok(false)
    }
}
