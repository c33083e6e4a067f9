//! Downloader port.
//!
//! A download is started with [`DownloaderPort::start`] and observed through
//! the returned [`DownloadHandle`]: a stream of [`DownloadEvent`]s that ends
//! with exactly one terminal event.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::download::{DownloadError, DownloadEvent, DownloadId, DownloadRequest};

/// Caller's side of a running download.
///
/// Dropping the handle before the terminal event cancels the download.
#[derive(Debug)]
pub struct DownloadHandle {
    id: DownloadId,
    events: mpsc::Receiver<DownloadEvent>,
    cancel: CancellationToken,
    finished: bool,
}

impl DownloadHandle {
    pub const fn new(
        id: DownloadId,
        events: mpsc::Receiver<DownloadEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            events,
            cancel,
            finished: false,
        }
    }

    pub const fn id(&self) -> DownloadId {
        self.id
    }

    /// Next event, or `None` once the download task has gone away.
    pub async fn next_event(&mut self) -> Option<DownloadEvent> {
        let event = self.events.recv().await;
        if event.as_ref().is_none_or(DownloadEvent::is_terminal) {
            self.finished = true;
        }
        event
    }

    /// Request cancellation. The task answers with a `Cancelled` event
    /// unless it already finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drain events until the terminal one, forwarding progress.
    pub async fn wait<F>(mut self, mut on_progress: F) -> Result<PathBuf, DownloadError>
    where
        F: FnMut(u64, u64) + Send,
    {
        while let Some(event) = self.next_event().await {
            match event {
                DownloadEvent::Progress { downloaded, total } => on_progress(downloaded, total),
                DownloadEvent::Completed { path } => return Ok(path),
                DownloadEvent::Failed { error } => return Err(error),
                DownloadEvent::Cancelled => return Err(DownloadError::Cancelled),
            }
        }
        Err(DownloadError::other("download task ended without a result"))
    }
}

impl Drop for DownloadHandle {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel.cancel();
        }
    }
}

/// Starts streaming downloads.
pub trait DownloaderPort: Send + Sync {
    /// Start a download in the background. Must be called inside a Tokio runtime.
    ///
    /// The destination path only ever holds a complete body; an existing
    /// file there survives a failed or cancelled download.
    fn start(&self, request: DownloadRequest) -> DownloadHandle;
}
