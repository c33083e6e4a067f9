//! Download worker pipeline.
//!
//! A worker owns one [`DownloadJob`] and talks to its caller only through
//! the job's event channel. Cancellation is observed around every await.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ddp_core::download::{DownloadError, DownloadEvent, DownloadState, DownloadTask};

use crate::progress::ProgressThrottle;
use crate::source::ByteSource;

/// Shared dependencies, cloned into each worker.
#[derive(Clone)]
pub struct WorkerDeps {
    pub source: Arc<dyn ByteSource>,
    pub permits: Arc<Semaphore>,
    pub progress_interval: Duration,
}

/// One download, as handed to a worker.
pub struct DownloadJob {
    pub task: DownloadTask,
    pub cancel: CancellationToken,
    pub events: mpsc::Sender<DownloadEvent>,
}

/// Run a job and deliver exactly one terminal event.
pub async fn run_job(mut job: DownloadJob, deps: WorkerDeps) {
    let mut partial = PartialFile::default();
    let result = execute(&mut job, &deps, &mut partial).await;

    let terminal = match result {
        Ok(path) => {
            job.task.transition(DownloadState::Completed);
            debug!(
                download_id = %job.task.id,
                path = %path.display(),
                bytes = job.task.bytes_downloaded,
                "Download completed"
            );
            DownloadEvent::Completed { path }
        }
        Err(DownloadError::Cancelled) => {
            partial.remove().await;
            job.task.transition(DownloadState::Cancelled);
            debug!(download_id = %job.task.id, "Download cancelled");
            DownloadEvent::Cancelled
        }
        Err(error) => {
            partial.remove().await;
            job.task.transition(DownloadState::Failed);
            warn!(
                download_id = %job.task.id,
                source = %job.task.source_locator,
                error = %error,
                "Download failed"
            );
            DownloadEvent::Failed { error }
        }
    };

    // A closed channel means the handle is gone; nobody is left to tell.
    let _ = job.events.send(terminal).await;
}

/// Staging file created by this worker, removed on failure.
#[derive(Default)]
struct PartialFile(Option<PathBuf>);

impl PartialFile {
    async fn remove(&mut self) {
        if let Some(path) = self.0.take() {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to remove partial download");
                }
            }
        }
    }
}

async fn execute(
    job: &mut DownloadJob,
    deps: &WorkerDeps,
    partial: &mut PartialFile,
) -> Result<PathBuf, DownloadError> {
    let cancel = job.cancel.clone();

    // Stay Pending until a slot frees up.
    let _permit = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(DownloadError::Cancelled),
        permit = Arc::clone(&deps.permits).acquire_owned() => {
            permit.map_err(|_| DownloadError::other("Downloader is shut down"))?
        }
    };

    let destination = job.task.destination.clone();
    check_parent(&destination)?;
    job.task.transition(DownloadState::InProgress);

    let body = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(DownloadError::Cancelled),
        body = deps.source.open(&job.task.source_locator) => body?,
    };

    // The server's length wins; the catalog size only fills in for display.
    if let Some(total) = body.total {
        job.task.total_bytes = total;
    }
    let advertised = body.total;

    let staging = staging_path(&destination);
    let mut file = tokio::fs::File::create(&staging)
        .await
        .map_err(|e| DownloadError::from_io_error(&e))?;
    partial.0 = Some(staging.clone());

    let mut throttle = ProgressThrottle::new(deps.progress_interval);
    throttle.should_emit(0);
    send(&job.events, job.task.progress_event()).await;

    let mut stream = body.stream;
    loop {
        let chunk = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(DownloadError::Cancelled),
            chunk = stream.next() => chunk,
        };
        let Some(chunk) = chunk else { break };
        let chunk = chunk?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;
        job.task.record_chunk(chunk.len() as u64);

        if throttle.should_emit(job.task.bytes_downloaded) {
            send(&job.events, job.task.progress_event()).await;
        }
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::from_io_error(&e))?;
    drop(file);

    if let Some(expected) = advertised {
        if job.task.bytes_downloaded != expected {
            return Err(DownloadError::Interrupted {
                bytes_downloaded: job.task.bytes_downloaded,
                expected,
            });
        }
    }

    // Only a complete body ever reaches the destination name.
    tokio::fs::rename(&staging, &destination)
        .await
        .map_err(|e| DownloadError::from_io_error(&e))?;
    partial.0 = None;

    if throttle.is_pending(job.task.bytes_downloaded) {
        throttle.mark_emitted(job.task.bytes_downloaded);
        send(&job.events, job.task.progress_event()).await;
    }

    Ok(destination)
}

/// `<file name>.part` next to the destination.
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

fn check_parent(destination: &Path) -> Result<(), DownloadError> {
    match destination.parent() {
        Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => Ok(()),
        Some(parent) => Err(DownloadError::destination_unavailable(
            parent.display().to_string(),
        )),
        None => Err(DownloadError::destination_unavailable(
            destination.display().to_string(),
        )),
    }
}

async fn send(events: &mpsc::Sender<DownloadEvent>, event: DownloadEvent) {
    let _ = events.send(event).await;
}
