//! In-memory fakes shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::download::{DownloadError, DownloadEvent, DownloadId, DownloadRequest};
use crate::events::AppEvent;
use crate::ports::{
    AppEventEmitter, CatalogPortError, CatalogPortResult, CatalogSourcePort, DownloadHandle,
    DownloaderPort, InstalledIndexError, InstalledSoftwarePort, RemoteEntry, ShortcutError,
    ShortcutPort,
};

const ROOT: &str = "Apps";

/// Catalog tree held in memory.
#[derive(Default)]
pub struct FakeCatalogSource {
    listings: HashMap<String, Vec<RemoteEntry>>,
    contents: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    requests: AtomicUsize,
}

impl FakeCatalogSource {
    pub fn new() -> Self {
        let mut source = Self::default();
        source.listings.insert(ROOT.to_string(), Vec::new());
        source
    }

    /// Add `Apps/<id>` with a `name.txt` and the given package files.
    pub fn with_app(mut self, id: &str, name: &str, packages: &[&str]) -> Self {
        let app = format!("{ROOT}/{id}");
        self.listings
            .entry(ROOT.to_string())
            .or_default()
            .push(RemoteEntry::directory(id, &app));

        let name_path = format!("{app}/Info/name.txt");
        self.listings.insert(
            format!("{app}/Info"),
            vec![RemoteEntry::file("name.txt", &name_path, name.len() as u64)],
        );
        self.contents.insert(name_path, name.as_bytes().to_vec());
        self.listings.insert(format!("{app}/Images"), Vec::new());
        self.listings.insert(
            format!("{app}/Package"),
            packages
                .iter()
                .map(|file| {
                    RemoteEntry::file(*file, format!("{app}/Package/{file}"), 8)
                        .with_download_locator(format!("https://dl.test/{id}/{file}"))
                })
                .collect(),
        );
        self
    }

    pub fn with_root_file(mut self, name: &str) -> Self {
        self.listings
            .entry(ROOT.to_string())
            .or_default()
            .push(RemoteEntry::file(name, format!("{ROOT}/{name}"), 1));
        self
    }

    /// Listing or fetching `path` fails.
    pub fn failing_path(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Every request sleeps first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn begin(&self, path: &str) -> CatalogPortResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(path) {
            return Err(CatalogPortError::Status {
                status: 500,
                url: path.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSourcePort for FakeCatalogSource {
    async fn list_directory(&self, path: &str) -> CatalogPortResult<Vec<RemoteEntry>> {
        self.begin(path).await?;
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| CatalogPortError::NotFound {
                path: path.to_string(),
            })
    }

    async fn fetch_content(&self, locator: &str) -> CatalogPortResult<Vec<u8>> {
        self.begin(locator).await?;
        self.contents
            .get(locator)
            .cloned()
            .ok_or_else(|| CatalogPortError::NotFound {
                path: locator.to_string(),
            })
    }
}

/// How a [`FakeDownloader`] behaves.
#[derive(Debug, Clone)]
pub enum FakeDownload {
    /// Write the payload in chunks and complete.
    Succeed(Vec<u8>),
    /// Write half the payload, then fail.
    FailMidway(Vec<u8>, DownloadError),
    /// Write one chunk, then wait for cancellation.
    Stall(Vec<u8>),
}

/// Writes scripted payloads next to the destination, renaming into place
/// only on success.
#[derive(Clone)]
pub struct FakeDownloader {
    behavior: FakeDownload,
    started: Arc<AtomicUsize>,
}

impl FakeDownloader {
    pub fn new(behavior: FakeDownload) -> Self {
        Self {
            behavior,
            started: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn succeeding(payload: &[u8]) -> Self {
        Self::new(FakeDownload::Succeed(payload.to_vec()))
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

async fn write_chunks(
    path: &Path,
    chunks: &[u8],
    total: u64,
    tx: &mpsc::Sender<DownloadEvent>,
) -> Result<u64, DownloadError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| DownloadError::from_io_error(&e))?;
    let mut written = 0u64;
    let _ = tx.send(DownloadEvent::Progress { downloaded: 0, total }).await;
    for chunk in chunks.chunks(4) {
        file.write_all(chunk)
            .await
            .map_err(|e| DownloadError::from_io_error(&e))?;
        written += chunk.len() as u64;
        let _ = tx.send(DownloadEvent::Progress { downloaded: written, total }).await;
    }
    file.flush().await.map_err(|e| DownloadError::from_io_error(&e))?;
    Ok(written)
}

impl DownloaderPort for FakeDownloader {
    fn start(&self, request: DownloadRequest) -> DownloadHandle {
        self.started.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let behavior = self.behavior.clone();

        tokio::spawn(async move {
            let dest = request.destination;
            if !dest.parent().is_some_and(Path::is_dir) {
                let error = DownloadError::destination_unavailable(dest.display().to_string());
                let _ = tx.send(DownloadEvent::Failed { error }).await;
                return;
            }
            let staging = staging_path(&dest);

            let terminal = match behavior {
                FakeDownload::Succeed(payload) => {
                    let written = write_chunks(&staging, &payload, payload.len() as u64, &tx).await;
                    let renamed = match written {
                        Ok(_) => tokio::fs::rename(&staging, &dest)
                            .await
                            .map_err(|e| DownloadError::from_io_error(&e)),
                        Err(error) => Err(error),
                    };
                    match renamed {
                        Ok(()) => DownloadEvent::Completed { path: dest.clone() },
                        Err(error) => DownloadEvent::Failed { error },
                    }
                }
                FakeDownload::FailMidway(payload, error) => {
                    let half = &payload[..payload.len() / 2];
                    let _ = write_chunks(&staging, half, payload.len() as u64, &tx).await;
                    let _ = tokio::fs::remove_file(&staging).await;
                    DownloadEvent::Failed { error }
                }
                FakeDownload::Stall(payload) => {
                    let first = &payload[..payload.len().min(4)];
                    let _ = write_chunks(&staging, first, payload.len() as u64, &tx).await;
                    token.cancelled().await;
                    let _ = tokio::fs::remove_file(&staging).await;
                    DownloadEvent::Cancelled
                }
            };
            let _ = tx.send(terminal).await;
        });

        DownloadHandle::new(DownloadId::new(), rx, cancel)
    }
}

/// Records every emitted event.
#[derive(Clone, Default)]
pub struct RecordingEmitter {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl AppEventEmitter for RecordingEmitter {
    fn emit(&self, event: AppEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}

/// Fixed OS index answer.
pub struct StaticInstalledIndex(pub Result<Vec<String>, InstalledIndexError>);

impl StaticInstalledIndex {
    pub const fn empty() -> Self {
        Self(Ok(Vec::new()))
    }
}

impl InstalledSoftwarePort for StaticInstalledIndex {
    fn display_names(&self) -> Result<Vec<String>, InstalledIndexError> {
        self.0.clone()
    }
}

/// Writes `<name>.lnk` files into a directory.
pub struct DirShortcuts {
    dir: PathBuf,
}

impl DirShortcuts {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ShortcutPort for DirShortcuts {
    fn shortcut_path(&self, app_name: &str) -> Option<PathBuf> {
        Some(self.dir.join(format!("{app_name}.lnk")))
    }

    fn create(&self, app_name: &str, target: &Path) -> Result<PathBuf, ShortcutError> {
        let path = self.dir.join(format!("{app_name}.lnk"));
        std::fs::write(&path, target.display().to_string()).map_err(|e| ShortcutError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(path)
    }

    fn remove(&self, app_name: &str) -> Result<bool, ShortcutError> {
        let path = self.dir.join(format!("{app_name}.lnk"));
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).map_err(|e| ShortcutError::Io {
            path,
            message: e.to_string(),
        })?;
        Ok(true)
    }
}
