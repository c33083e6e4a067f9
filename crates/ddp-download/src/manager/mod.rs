//! Streaming download manager.
//!
//! Owns the shared semaphore and spawns one worker per started download.
//! Callers observe and cancel downloads through the returned handle.

mod worker;

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use ddp_core::download::{DownloadId, DownloadRequest, DownloadTask};
use ddp_core::ports::{DownloadHandle, DownloaderPort};

use crate::config::DownloaderConfig;
use crate::source::ByteSource;

use worker::{DownloadJob, WorkerDeps, run_job};

/// [`DownloaderPort`] implementation that streams bodies to disk.
pub struct StreamingDownloader {
    deps: WorkerDeps,
    config: DownloaderConfig,
}

impl StreamingDownloader {
    pub fn new(source: Arc<dyn ByteSource>, config: DownloaderConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
        Self {
            deps: WorkerDeps {
                source,
                permits,
                progress_interval: config.progress_interval,
            },
            config,
        }
    }

    pub const fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Slots currently free for streaming.
    pub fn available_slots(&self) -> usize {
        self.deps.permits.available_permits()
    }
}

impl DownloaderPort for StreamingDownloader {
    fn start(&self, request: DownloadRequest) -> DownloadHandle {
        let id = DownloadId::new();
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let cancel = CancellationToken::new();

        debug!(
            download_id = %id,
            source = %request.source_locator,
            destination = %request.destination.display(),
            "Queueing download"
        );

        let job = DownloadJob {
            task: DownloadTask::new(id, &request),
            cancel: cancel.clone(),
            events: tx,
        };
        tokio::spawn(run_job(job, self.deps.clone()));

        DownloadHandle::new(id, rx, cancel)
    }
}
