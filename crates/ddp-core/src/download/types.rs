use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DownloadError;

/// Identifier of one download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DownloadId(Uuid);

impl DownloadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DownloadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to download and where to put it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub source_locator: String,
    pub destination: PathBuf,
    /// Size advertised by the catalog listing; used when the server sends no length.
    pub expected_size: Option<u64>,
}

impl DownloadRequest {
    pub fn new(source_locator: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_locator: source_locator.into(),
            destination: destination.into(),
            expected_size: None,
        }
    }

    #[must_use]
    pub const fn with_expected_size(mut self, size: u64) -> Self {
        self.expected_size = Some(size);
        self
    }
}

/// Lifecycle of a download task.
///
/// `Pending -> InProgress -> {Completed | Failed | Cancelled}`; a pending
/// task may also be cancelled or fail directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl DownloadState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Snapshot of one download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    pub id: DownloadId,
    pub source_locator: String,
    pub destination: PathBuf,
    pub bytes_downloaded: u64,
    /// Zero when unknown.
    pub total_bytes: u64,
    pub state: DownloadState,
}

impl DownloadTask {
    pub fn new(id: DownloadId, request: &DownloadRequest) -> Self {
        Self {
            id,
            source_locator: request.source_locator.clone(),
            destination: request.destination.clone(),
            bytes_downloaded: 0,
            total_bytes: request.expected_size.unwrap_or(0),
            state: DownloadState::Pending,
        }
    }

    /// Move to `next` if the transition is allowed. Returns whether it happened.
    pub fn transition(&mut self, next: DownloadState) -> bool {
        let allowed = match (self.state, next) {
            (DownloadState::Pending, DownloadState::InProgress) => true,
            (DownloadState::Pending | DownloadState::InProgress, s) => s.is_terminal(),
            _ => false,
        };
        if allowed {
            self.state = next;
        }
        allowed
    }

    /// Add received bytes. The counter never decreases.
    pub const fn record_chunk(&mut self, len: u64) {
        self.bytes_downloaded = self.bytes_downloaded.saturating_add(len);
    }

    pub fn progress_event(&self) -> DownloadEvent {
        DownloadEvent::Progress {
            downloaded: self.bytes_downloaded,
            total: self.total_bytes,
        }
    }
}

/// Events delivered through a download handle.
///
/// Zero or more `Progress` events followed by exactly one terminal event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    Progress { downloaded: u64, total: u64 },
    Completed { path: PathBuf },
    Failed { error: DownloadError },
    Cancelled,
}

impl DownloadEvent {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}
