//! Install/uninstall state machine.
//!
//! `NotInstalled -> Installing -> Installed` and
//! `Installed -> Uninstalling -> NotInstalled`. Nothing is persisted; the
//! installed flag is always recomputed by [`InstalledStateIndex`]. Operations
//! on the same app id are serialised.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::AppManifest;
use crate::download::{DownloadError, DownloadEvent, DownloadRequest};
use crate::install::{InstallError, InstallResult, KeyedLocks};
use crate::paths::ensure_directory;
use crate::ports::{DownloaderPort, ShortcutPort};

use super::InstalledStateIndex;

/// A finished install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub app_id: String,
    pub install_dir: PathBuf,
    pub artifact_path: PathBuf,
    pub bytes_downloaded: u64,
}

/// A validated uninstall waiting for the caller's confirmation.
///
/// Only [`InstallManager::prepare_uninstall`] creates plans, so committing
/// always goes through the precondition check first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallPlan {
    app_id: String,
    app_name: String,
    install_dir: PathBuf,
}

impl UninstallPlan {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The directory that will be deleted.
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }
}

/// A finished uninstall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallOutcome {
    pub app_id: String,
    pub removed_dir: PathBuf,
    pub shortcut_removed: bool,
    /// Set when the shortcut could not be removed.
    pub shortcut_warning: Option<String>,
}

pub struct InstallManager {
    index: Arc<InstalledStateIndex>,
    downloader: Arc<dyn DownloaderPort>,
    shortcuts: Arc<dyn ShortcutPort>,
    locks: KeyedLocks,
}

impl InstallManager {
    pub fn new(
        index: Arc<InstalledStateIndex>,
        downloader: Arc<dyn DownloaderPort>,
        shortcuts: Arc<dyn ShortcutPort>,
    ) -> Self {
        Self {
            index,
            downloader,
            shortcuts,
            locks: KeyedLocks::new(),
        }
    }

    pub const fn index(&self) -> &Arc<InstalledStateIndex> {
        &self.index
    }

    pub fn shortcuts(&self) -> &dyn ShortcutPort {
        self.shortcuts.as_ref()
    }

    /// Whether an install or uninstall of `app_id` is running.
    pub fn is_busy(&self, app_id: &str) -> bool {
        self.locks.is_locked(app_id)
    }

    /// Download the primary artifact into the app's install directory.
    ///
    /// Progress is forwarded verbatim. On failure the directory is left in
    /// place; the downloader has already removed the partial artifact.
    pub async fn install<F>(
        &self,
        manifest: &AppManifest,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> InstallResult<InstallOutcome>
    where
        F: FnMut(u64, u64) + Send,
    {
        let app_id = manifest.id.clone();
        let artifact = manifest
            .primary_artifact()
            .ok_or_else(|| InstallError::NoInstallableArtifact {
                app_id: app_id.clone(),
            })?;
        let destination = self
            .index
            .layout()
            .artifact_path(&app_id, &artifact.file_name)
            .ok_or_else(|| InstallError::InstallFailed {
                app_id: app_id.clone(),
                cause: DownloadError::other(format!(
                    "package file name '{}' is not a plain file name",
                    artifact.file_name
                )),
            })?;
        let install_dir = self.index.install_dir_for(&app_id);

        let _guard = self.locks.lock(&app_id).await;
        if cancel.is_cancelled() {
            return Err(InstallError::InstallFailed {
                app_id,
                cause: DownloadError::Cancelled,
            });
        }

        ensure_directory(&install_dir).map_err(|e| InstallError::DirectoryCreateFailed {
            path: install_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(app_id = %app_id, file = %artifact.file_name, dir = %install_dir.display(), "installing");

        let mut request = DownloadRequest::new(artifact.source_locator.clone(), destination);
        if artifact.size_bytes > 0 {
            request = request.with_expected_size(artifact.size_bytes);
        }
        let mut handle = self.downloader.start(request);
        let mut bytes_downloaded = 0;

        let result = loop {
            let event = tokio::select! {
                biased;
                () = cancel.cancelled(), if !handle.is_cancel_requested() => {
                    debug!(app_id = %app_id, "cancelling download");
                    handle.cancel();
                    continue;
                }
                event = handle.next_event() => event,
            };

            match event {
                Some(DownloadEvent::Progress { downloaded, total }) => {
                    bytes_downloaded = downloaded;
                    on_progress(downloaded, total);
                }
                Some(DownloadEvent::Completed { path }) => break Ok(path),
                Some(DownloadEvent::Failed { error }) => break Err(error),
                Some(DownloadEvent::Cancelled) => break Err(DownloadError::Cancelled),
                None => break Err(DownloadError::other("download task ended without a result")),
            }
        };

        match result {
            Ok(artifact_path) => {
                info!(app_id = %app_id, path = %artifact_path.display(), "install complete");
                Ok(InstallOutcome {
                    app_id,
                    install_dir,
                    artifact_path,
                    bytes_downloaded,
                })
            }
            Err(cause) => {
                warn!(app_id = %app_id, error = %cause, "install failed");
                Err(InstallError::InstallFailed { app_id, cause })
            }
        }
    }

    /// Create a desktop shortcut to the installed primary artifact.
    ///
    /// Failures never affect the install itself.
    pub fn create_shortcut(&self, manifest: &AppManifest) -> InstallResult<PathBuf> {
        let target = self
            .index
            .primary_artifact_path(manifest)
            .filter(|path| path.is_file())
            .ok_or_else(|| InstallError::NotInstalled {
                app_id: manifest.id.clone(),
            })?;

        match self.shortcuts.create(&manifest.name, &target) {
            Ok(path) => {
                info!(app_id = %manifest.id, path = %path.display(), "shortcut created");
                Ok(path)
            }
            Err(e) => {
                warn!(app_id = %manifest.id, error = %e, "shortcut creation failed");
                Err(InstallError::ShortcutFailed {
                    app_id: manifest.id.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// First phase of uninstall: check the precondition without touching disk.
    pub fn prepare_uninstall(&self, manifest: &AppManifest) -> InstallResult<UninstallPlan> {
        let install_dir = self.index.install_dir_for(&manifest.id);
        if !install_dir.is_dir() {
            return Err(InstallError::NotInstalled {
                app_id: manifest.id.clone(),
            });
        }
        Ok(UninstallPlan {
            app_id: manifest.id.clone(),
            app_name: manifest.name.clone(),
            install_dir,
        })
    }

    /// Second phase: delete the install directory, then the shortcut.
    pub async fn commit_uninstall(&self, plan: UninstallPlan) -> InstallResult<UninstallOutcome> {
        let _guard = self.locks.lock(&plan.app_id).await;

        // Re-check under the lock; an earlier commit may have won.
        if !plan.install_dir.is_dir() {
            return Err(InstallError::NotInstalled {
                app_id: plan.app_id,
            });
        }

        std::fs::remove_dir_all(&plan.install_dir).map_err(|e| {
            warn!(app_id = %plan.app_id, error = %e, "uninstall failed");
            InstallError::UninstallFailed {
                app_id: plan.app_id.clone(),
                reason: e.to_string(),
            }
        })?;
        info!(app_id = %plan.app_id, dir = %plan.install_dir.display(), "install directory removed");

        let (shortcut_removed, shortcut_warning) = match self.shortcuts.remove(&plan.app_name) {
            Ok(removed) => (removed, None),
            Err(e) => {
                warn!(app_id = %plan.app_id, error = %e, "shortcut removal failed");
                (false, Some(e.to_string()))
            }
        };

        Ok(UninstallOutcome {
            app_id: plan.app_id,
            removed_dir: plan.install_dir,
            shortcut_removed,
            shortcut_warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageFile;
    use crate::paths::InstallLayout;
    use crate::ports::shortcut::MockShortcutPort;
    use crate::ports::{NoopShortcuts, ShortcutError};
    use crate::testing::{DirShortcuts, FakeDownload, FakeDownloader, StaticInstalledIndex};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    const PAYLOAD: &[u8] = b"0123456789abcdef";

    fn manifest(id: &str, packages: &[&str]) -> AppManifest {
        let mut manifest = AppManifest::new(id);
        manifest.name = format!("{id} App");
        manifest.package_files = packages
            .iter()
            .map(|file| PackageFile {
                file_name: (*file).to_string(),
                source_locator: format!("https://dl.test/{file}"),
                size_bytes: PAYLOAD.len() as u64,
            })
            .collect();
        manifest
    }

    fn manager(
        temp: &TempDir,
        downloader: FakeDownloader,
        shortcuts: Arc<dyn ShortcutPort>,
    ) -> (InstallManager, Arc<FakeDownloader>) {
        let index = Arc::new(InstalledStateIndex::new(
            InstallLayout::with_default_namespace(temp.path().join("data")),
            Arc::new(StaticInstalledIndex::empty()),
        ));
        let downloader = Arc::new(downloader);
        let manager = InstallManager::new(index, downloader.clone(), shortcuts);
        (manager, downloader)
    }

    #[tokio::test]
    async fn install_downloads_first_package() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));
        let m = manifest("Tool", &["tool.zip", "other.zip"]);

        let mut progress = Vec::new();
        let outcome = manager
            .install(&m, &CancellationToken::new(), |d, t| progress.push((d, t)))
            .await
            .unwrap();

        assert_eq!(outcome.artifact_path, outcome.install_dir.join("tool.zip"));
        assert_eq!(fs::read(&outcome.artifact_path).unwrap(), PAYLOAD);
        assert!(!outcome.install_dir.join("other.zip").exists());
        assert!(progress.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(progress.last().map(|p| p.0), Some(PAYLOAD.len() as u64));
        assert!(manager.index().is_installed(&m));
    }

    #[tokio::test]
    async fn no_packages_fails_without_side_effects() {
        let temp = TempDir::new().unwrap();
        let (manager, downloader) =
            manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));

        let err = manager
            .install(&manifest("Empty", &[]), &CancellationToken::new(), |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::NoInstallableArtifact { .. }));
        assert_eq!(downloader.started(), 0);
        assert!(!temp.path().join("data").exists());
    }

    #[tokio::test]
    async fn download_failure_keeps_directory() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(
            &temp,
            FakeDownloader::new(FakeDownload::FailMidway(
                PAYLOAD.to_vec(),
                DownloadError::network_with_status("bad gateway", 502),
            )),
            Arc::new(NoopShortcuts),
        );
        let m = manifest("Tool", &["tool.zip"]);

        let err = manager
            .install(&m, &CancellationToken::new(), |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            InstallError::InstallFailed { cause: DownloadError::Network { .. }, .. }
        ));
        let dir = manager.index().install_dir_for("Tool");
        assert!(dir.is_dir());
        assert!(!dir.join("tool.zip").exists());
        assert!(!manager.index().is_installed(&m));
    }

    #[tokio::test]
    async fn directory_create_failure() {
        let temp = TempDir::new().unwrap();
        // A file where the namespace directory should be.
        fs::create_dir_all(temp.path().join("data")).unwrap();
        fs::write(temp.path().join("data").join("DDPApps"), b"x").unwrap();
        let (manager, downloader) =
            manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));

        let err = manager
            .install(&manifest("Tool", &["tool.zip"]), &CancellationToken::new(), |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, InstallError::DirectoryCreateFailed { .. }));
        assert_eq!(downloader.started(), 0);
    }

    #[tokio::test]
    async fn cancel_stops_download() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(
            &temp,
            FakeDownloader::new(FakeDownload::Stall(PAYLOAD.to_vec())),
            Arc::new(NoopShortcuts),
        );
        let m = manifest("Tool", &["tool.zip"]);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = manager.install(&m, &cancel, |_, _| {}).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(!manager.index().install_dir_for("Tool").join("tool.zip").exists());
    }

    #[tokio::test]
    async fn uninstall_is_two_phase() {
        let temp = TempDir::new().unwrap();
        let desktop = temp.path().join("desktop");
        fs::create_dir_all(&desktop).unwrap();
        let (manager, _) = manager(
            &temp,
            FakeDownloader::succeeding(PAYLOAD),
            Arc::new(DirShortcuts::new(&desktop)),
        );
        let m = manifest("Tool", &["tool.zip"]);

        manager
            .install(&m, &CancellationToken::new(), |_, _| {})
            .await
            .unwrap();
        let shortcut = manager.create_shortcut(&m).unwrap();
        assert!(shortcut.exists());

        let plan = manager.prepare_uninstall(&m).unwrap();
        assert_eq!(plan.app_id(), "Tool");
        // Preparing alone changes nothing.
        assert!(plan.install_dir().is_dir());

        let outcome = manager.commit_uninstall(plan).await.unwrap();
        assert!(outcome.shortcut_removed);
        assert!(!outcome.removed_dir.exists());
        assert!(!shortcut.exists());
        assert!(!manager.index().is_installed(&m));
    }

    #[tokio::test]
    async fn uninstall_missing_app_fails() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));
        assert!(matches!(
            manager.prepare_uninstall(&manifest("Ghost", &["g.zip"])),
            Err(InstallError::NotInstalled { .. })
        ));
    }

    #[tokio::test]
    async fn stale_plan_reports_not_installed() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));
        let m = manifest("Tool", &["tool.zip"]);
        manager
            .install(&m, &CancellationToken::new(), |_, _| {})
            .await
            .unwrap();

        let first = manager.prepare_uninstall(&m).unwrap();
        let second = manager.prepare_uninstall(&m).unwrap();
        manager.commit_uninstall(first).await.unwrap();
        assert!(matches!(
            manager.commit_uninstall(second).await,
            Err(InstallError::NotInstalled { .. })
        ));
    }

    #[tokio::test]
    async fn shortcut_failure_is_reported_not_fatal() {
        let temp = TempDir::new().unwrap();
        let mut shortcuts = MockShortcutPort::new();
        shortcuts
            .expect_create()
            .returning(|_, _| Err(ShortcutError::NoDesktopDir));
        shortcuts
            .expect_remove()
            .returning(|_| Err(ShortcutError::CommandFailed { message: "locked".into() }));
        let (manager, _) = manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(shortcuts));
        let m = manifest("Tool", &["tool.zip"]);

        manager
            .install(&m, &CancellationToken::new(), |_, _| {})
            .await
            .unwrap();
        assert!(matches!(
            manager.create_shortcut(&m),
            Err(InstallError::ShortcutFailed { .. })
        ));
        assert!(manager.index().is_installed(&m));

        let plan = manager.prepare_uninstall(&m).unwrap();
        let outcome = manager.commit_uninstall(plan).await.unwrap();
        assert!(!outcome.shortcut_removed);
        assert!(outcome.shortcut_warning.is_some());
        assert!(!manager.index().is_installed(&m));
    }

    #[tokio::test]
    async fn shortcut_requires_installed_artifact() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));
        assert!(matches!(
            manager.create_shortcut(&manifest("Tool", &["tool.zip"])),
            Err(InstallError::NotInstalled { .. })
        ));
    }

    #[tokio::test]
    async fn unsafe_package_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let (manager, downloader) =
            manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));
        let err = manager
            .install(&manifest("Tool", &["../evil.exe"]), &CancellationToken::new(), |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::InstallFailed { .. }));
        assert_eq!(downloader.started(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn same_app_operations_are_serialised() {
        let temp = TempDir::new().unwrap();
        let (manager, _) = manager(&temp, FakeDownloader::succeeding(PAYLOAD), Arc::new(NoopShortcuts));
        let manager = Arc::new(manager);
        let m = manifest("Tool", &["tool.zip"]);

        let a = {
            let (manager, m) = (Arc::clone(&manager), m.clone());
            tokio::spawn(async move {
                manager.install(&m, &CancellationToken::new(), |_, _| {}).await
            })
        };
        let b = {
            let (manager, m) = (Arc::clone(&manager), m.clone());
            tokio::spawn(async move {
                manager.install(&m, &CancellationToken::new(), |_, _| {}).await
            })
        };
        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());
        assert_eq!(
            fs::read(manager.index().install_dir_for("Tool").join("tool.zip")).unwrap(),
            PAYLOAD
        );
    }
}
