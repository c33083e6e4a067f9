//! Download error types.
//!
//! Serializable and free of `std::io::Error`; I/O failures keep only their
//! kind and message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for download operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// The destination's parent directory does not exist.
    #[error("Destination unavailable: {path}")]
    DestinationUnavailable {
        /// The directory that was expected to exist.
        path: String,
    },

    /// I/O error during file operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "not found", "permission denied").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// Network/HTTP error during download.
    #[error("Network error: {message}")]
    Network {
        /// Detailed error message.
        message: String,
        /// HTTP status code if available.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// The body ended before the advertised length was received.
    #[error("Download interrupted at {bytes_downloaded} of {expected} bytes")]
    Interrupted {
        bytes_downloaded: u64,
        expected: u64,
    },

    /// Download was cancelled by user.
    #[error("Download cancelled")]
    Cancelled,

    /// General/uncategorized error.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl DownloadError {
    pub fn destination_unavailable(path: impl Into<String>) -> Self {
        Self::DestinationUnavailable { path: path.into() }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn network_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Network {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::DestinationUnavailable { path } => {
                format!("The install folder {path} does not exist.")
            }
            Self::Io { message, .. } => format!("File operation failed: {message}"),
            Self::Network {
                message,
                status_code: Some(code),
            } => format!("Network error (HTTP {code}): {message}"),
            Self::Network { message, .. } => format!("Network error: {message}"),
            Self::Interrupted {
                bytes_downloaded,
                expected,
            } => format!(
                "Download stopped after {bytes_downloaded} of {expected} bytes. Try again."
            ),
            Self::Cancelled => "Download was cancelled.".to_string(),
            Self::Other { message } => message.clone(),
        }
    }
}

/// Convenience result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;
