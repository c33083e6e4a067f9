//! Port for the operating system's installed-software index.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstalledIndexError {
    #[error("Installed-software index is not available on {platform}")]
    Unsupported { platform: String },

    #[error("Installed-software query failed: {message}")]
    QueryFailed { message: String },
}

/// Lists display names of software the OS considers installed.
///
/// A failure means "unknown", never "not installed": callers fall back to
/// the on-disk check.
#[cfg_attr(test, mockall::automock)]
pub trait InstalledSoftwarePort: Send + Sync {
    fn display_names(&self) -> Result<Vec<String>, InstalledIndexError>;
}

/// Always reports the index as unavailable.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedInstalledIndex;

impl InstalledSoftwarePort for UnsupportedInstalledIndex {
    fn display_names(&self) -> Result<Vec<String>, InstalledIndexError> {
        Err(InstalledIndexError::Unsupported {
            platform: std::env::consts::OS.to_string(),
        })
    }
}
