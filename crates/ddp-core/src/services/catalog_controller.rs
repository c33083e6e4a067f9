//! The controller presentation layers talk to.
//!
//! Runs catalog syncs (fetch, assemble, classify, publish), keeps the
//! published catalog, routes install/uninstall requests into the
//! [`InstallManager`] and relays everything outward as [`AppEvent`]s.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use indexmap::IndexMap;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::catalog::{
    CatalogError, FetcherConfig, RemoteTreeFetcher, TraversalEvent, TraversalSummary,
};
use crate::domain::{CatalogEntry, InstallRecord, InstallState};
use crate::events::AppEvent;
use crate::install::{InstallError, InstallResult};
use crate::manifest::assemble_listing;
use crate::paths::InstallLayout;
use crate::ports::{
    AppEventEmitter, CatalogSourcePort, DownloaderPort, InstalledSoftwarePort, ShortcutPort,
};

use super::{InstallManager, InstallOutcome, InstalledStateIndex, UninstallOutcome, UninstallPlan};

/// How long [`CatalogController::shutdown`] waits for background work.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Everything the controller needs from the outside.
pub struct CatalogControllerDeps {
    pub source: Arc<dyn CatalogSourcePort>,
    pub downloader: Arc<dyn DownloaderPort>,
    pub os_index: Arc<dyn InstalledSoftwarePort>,
    pub shortcuts: Arc<dyn ShortcutPort>,
    pub emitter: Arc<dyn AppEventEmitter>,
    pub layout: InstallLayout,
    pub fetcher: FetcherConfig,
}

#[derive(Default)]
struct Catalog {
    generation: u64,
    entries: IndexMap<String, CatalogEntry>,
}

struct SyncSlot {
    generation: u64,
    cancel: CancellationToken,
}

struct ActiveOp {
    op_id: u64,
    state: InstallState,
    cancel: CancellationToken,
}

struct Inner {
    fetcher: RemoteTreeFetcher,
    installer: InstallManager,
    emitter: Arc<dyn AppEventEmitter>,
    catalog: RwLock<Catalog>,
    sync: Mutex<Option<SyncSlot>>,
    active: Mutex<HashMap<String, Vec<ActiveOp>>>,
    next_op: AtomicU64,
    tasks: TaskTracker,
    shutdown: CancellationToken,
}

/// Removes an in-flight operation when the operation ends or is dropped.
struct OpGuard<'a> {
    inner: &'a Inner,
    app_id: String,
    op_id: u64,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.inner.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ops) = active.get_mut(&self.app_id) {
            ops.retain(|op| op.op_id != self.op_id);
            if ops.is_empty() {
                active.remove(&self.app_id);
            }
        }
    }
}

impl Inner {
    fn begin_sync(&self) -> (CancellationToken, u64) {
        let cancel = self.shutdown.child_token();
        let generation = {
            let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
            catalog.generation += 1;
            catalog.entries.clear();
            catalog.generation
        };

        let previous = self
            .sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(SyncSlot {
                generation,
                cancel: cancel.clone(),
            });
        if let Some(previous) = previous {
            debug!(generation = previous.generation, "superseding running sync");
            previous.cancel.cancel();
        }

        self.emitter.emit(AppEvent::CatalogStarted);
        (cancel, generation)
    }

    /// Insert or replace an entry if `generation` is still current.
    fn publish(&self, generation: u64, entry: CatalogEntry) -> bool {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        if catalog.generation != generation {
            return false;
        }
        catalog.entries.insert(entry.manifest.id.clone(), entry);
        true
    }

    async fn run_sync(&self, cancel: CancellationToken, generation: u64) -> TraversalSummary {
        self.installer.index().refresh();

        let mut published = 0usize;
        let result = self
            .fetcher
            .traverse(&cancel, |event| match event {
                TraversalEvent::AppReady(listing) => {
                    let manifest = assemble_listing(&listing);
                    let installed = self.installer.index().is_installed(&manifest);
                    let entry = CatalogEntry {
                        manifest,
                        installed,
                    };
                    if !cancel.is_cancelled() && self.publish(generation, entry.clone()) {
                        published += 1;
                        self.emitter.emit(AppEvent::manifest_ready(entry));
                    }
                }
                TraversalEvent::AppSkipped(err) => {
                    if let CatalogError::AppFetchSkipped { app_id, .. } = &err {
                        self.emitter
                            .emit(AppEvent::app_skipped(app_id.clone(), err.user_message()));
                    }
                }
            })
            .await;

        let summary = match result {
            Ok(summary) => summary,
            Err(err) => {
                error!(error = %err, "catalog sync failed");
                self.emitter.emit(AppEvent::catalog_error(err.user_message()));
                TraversalSummary::default()
            }
        };

        {
            let mut slot = self.sync.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|s| s.generation == generation) {
                *slot = None;
            }
        }

        self.emitter.emit(AppEvent::catalog_finished(
            published,
            summary.skipped,
            summary.cancelled,
        ));
        summary
    }

    /// Register an in-flight operation. Installs are single-flight: the
    /// check and the registration happen under one lock.
    fn begin_op(
        &self,
        app_id: &str,
        state: InstallState,
    ) -> InstallResult<(OpGuard<'_>, CancellationToken)> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let ops = active.entry(app_id.to_string()).or_default();
        if state == InstallState::Installing
            && ops.iter().any(|op| op.state == InstallState::Installing)
        {
            return Err(InstallError::Busy {
                app_id: app_id.to_string(),
                state: InstallState::Installing.to_string(),
            });
        }

        let cancel = self.shutdown.child_token();
        let op_id = self.next_op.fetch_add(1, Ordering::Relaxed);
        ops.push(ActiveOp {
            op_id,
            state,
            cancel: cancel.clone(),
        });
        drop(active);

        let guard = OpGuard {
            inner: self,
            app_id: app_id.to_string(),
            op_id,
        };
        Ok((guard, cancel))
    }

    fn active_state(&self, app_id: &str) -> Option<InstallState> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(app_id)
            .and_then(|ops| ops.first())
            .map(|op| op.state)
    }

    /// Recompute the installed flag of one published entry.
    fn update_installed(&self, app_id: &str) {
        let mut catalog = self.catalog.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = catalog.entries.get_mut(app_id) {
            entry.installed = self.installer.index().is_installed(&entry.manifest);
        }
    }
}

/// Cheap to clone; all clones share one catalog and one set of tasks.
#[derive(Clone)]
pub struct CatalogController {
    inner: Arc<Inner>,
}

impl CatalogController {
    pub fn new(deps: CatalogControllerDeps) -> Self {
        let index = Arc::new(InstalledStateIndex::new(deps.layout, deps.os_index));
        let installer = InstallManager::new(index, deps.downloader, deps.shortcuts);
        Self {
            inner: Arc::new(Inner {
                fetcher: RemoteTreeFetcher::new(deps.source, deps.fetcher),
                installer,
                emitter: deps.emitter,
                catalog: RwLock::new(Catalog::default()),
                sync: Mutex::new(None),
                active: Mutex::new(HashMap::new()),
                next_op: AtomicU64::new(0),
                tasks: TaskTracker::new(),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn layout(&self) -> &InstallLayout {
        self.inner.installer.index().layout()
    }

    // ========== Sync ==========

    /// Start a sync in the background, cancelling any sync still running.
    ///
    /// The previous catalog is cleared; entries are published as apps arrive.
    /// Exactly one `CatalogFinished` event is emitted per sync.
    pub fn start_sync(&self) -> JoinHandle<TraversalSummary> {
        let (cancel, generation) = self.inner.begin_sync();
        let inner = Arc::clone(&self.inner);
        self.inner
            .tasks
            .spawn(async move { inner.run_sync(cancel, generation).await })
    }

    /// Run a sync to completion on the current task.
    pub async fn sync(&self) -> TraversalSummary {
        let (cancel, generation) = self.inner.begin_sync();
        self.inner.run_sync(cancel, generation).await
    }

    /// Cancel the running sync, if any.
    pub fn stop_sync(&self) {
        let slot = self
            .inner
            .sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(slot) = slot {
            info!(generation = slot.generation, "stopping catalog sync");
            slot.cancel.cancel();
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.inner
            .sync
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ========== Queries ==========

    /// Published entries in arrival order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .values()
            .cloned()
            .collect()
    }

    pub fn entry(&self, app_id: &str) -> Option<CatalogEntry> {
        self.inner
            .catalog
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(app_id)
            .cloned()
    }

    /// Look up by exact id, then by display name or id ignoring case.
    pub fn find(&self, query: &str) -> Option<CatalogEntry> {
        if let Some(entry) = self.entry(query) {
            return Some(entry);
        }
        let wanted = query.to_lowercase();
        let catalog = self.inner.catalog.read().unwrap_or_else(PoisonError::into_inner);
        catalog
            .entries
            .values()
            .find(|entry| entry.manifest.name.to_lowercase() == wanted)
            .or_else(|| {
                catalog
                    .entries
                    .values()
                    .find(|entry| entry.manifest.id.to_lowercase() == wanted)
            })
            .cloned()
    }

    pub fn install_state(&self, app_id: &str) -> InstallState {
        if let Some(state) = self.inner.active_state(app_id) {
            return state;
        }
        match self.entry(app_id) {
            Some(entry) if entry.installed => InstallState::Installed,
            _ => InstallState::NotInstalled,
        }
    }

    pub fn install_record(&self, app_id: &str) -> Option<InstallRecord> {
        let entry = self.entry(app_id)?;
        Some(
            self.inner
                .installer
                .index()
                .record_for(&entry.manifest, self.inner.installer.shortcuts()),
        )
    }

    /// Re-query the OS index and recompute every installed flag.
    pub fn refresh_installed(&self) {
        let index = self.inner.installer.index();
        index.refresh();
        let mut catalog = self.inner.catalog.write().unwrap_or_else(PoisonError::into_inner);
        for entry in catalog.entries.values_mut() {
            entry.installed = index.is_installed(&entry.manifest);
        }
    }

    fn lookup(&self, app_id: &str) -> InstallResult<CatalogEntry> {
        self.entry(app_id).ok_or_else(|| InstallError::UnknownApp {
            app_id: app_id.to_string(),
        })
    }

    // ========== Install ==========

    /// Install an app, emitting progress and a final `InstallResult` event.
    ///
    /// A second install of an app that is already installing is refused
    /// with `Busy`.
    pub async fn install(&self, app_id: &str) -> InstallResult<InstallOutcome> {
        let result = self.install_inner(app_id).await;
        match &result {
            Ok(outcome) => self.inner.emitter.emit(AppEvent::install_succeeded(
                app_id,
                outcome.artifact_path.clone(),
            )),
            Err(err) => self
                .inner
                .emitter
                .emit(AppEvent::install_failed(app_id, err.user_message())),
        }
        result
    }

    async fn install_inner(&self, app_id: &str) -> InstallResult<InstallOutcome> {
        let entry = self.lookup(app_id)?;
        let (guard, cancel) = self.inner.begin_op(app_id, InstallState::Installing)?;
        let emitter = Arc::clone(&self.inner.emitter);
        let id = entry.manifest.id.clone();
        let result = self
            .inner
            .installer
            .install(&entry.manifest, &cancel, |downloaded, total| {
                emitter.emit(AppEvent::download_progress(id.clone(), downloaded, total));
            })
            .await;
        drop(guard);

        self.inner.update_installed(app_id);
        result
    }

    /// Run [`install`](Self::install) as a tracked background task.
    pub fn spawn_install(&self, app_id: &str) -> JoinHandle<InstallResult<InstallOutcome>> {
        let this = self.clone();
        let app_id = app_id.to_string();
        self.inner
            .tasks
            .spawn(async move { this.install(&app_id).await })
    }

    /// Cancel a running install. Returns whether one was running.
    pub fn cancel_install(&self, app_id: &str) -> bool {
        let active = self.inner.active.lock().unwrap_or_else(PoisonError::into_inner);
        let mut cancelled = false;
        for op in active
            .get(app_id)
            .into_iter()
            .flatten()
            .filter(|op| op.state == InstallState::Installing)
        {
            op.cancel.cancel();
            cancelled = true;
        }
        if cancelled {
            info!(app_id = %app_id, "install cancellation requested");
        }
        cancelled
    }

    /// Best-effort shortcut creation; failures become `ShortcutWarning` events.
    pub fn create_shortcut(&self, app_id: &str) -> InstallResult<PathBuf> {
        let entry = self.lookup(app_id)?;
        let result = self.inner.installer.create_shortcut(&entry.manifest);
        if let Err(err) = &result {
            self.inner
                .emitter
                .emit(AppEvent::shortcut_warning(app_id, err.user_message()));
        }
        result
    }

    // ========== Uninstall ==========

    /// Validate an uninstall. Nothing is deleted until the plan is committed.
    pub fn request_uninstall(&self, app_id: &str) -> InstallResult<UninstallPlan> {
        let entry = self.lookup(app_id)?;
        self.inner.installer.prepare_uninstall(&entry.manifest)
    }

    /// Execute a confirmed uninstall and emit `UninstallResult`.
    pub async fn commit_uninstall(&self, plan: UninstallPlan) -> InstallResult<UninstallOutcome> {
        let app_id = plan.app_id().to_string();
        let (guard, _cancel) = self.inner.begin_op(&app_id, InstallState::Uninstalling)?;
        let result = self.inner.installer.commit_uninstall(plan).await;
        drop(guard);
        self.inner.update_installed(&app_id);

        match &result {
            Ok(outcome) => {
                if let Some(warning) = &outcome.shortcut_warning {
                    self.inner
                        .emitter
                        .emit(AppEvent::shortcut_warning(&app_id, warning.clone()));
                }
                self.inner.emitter.emit(AppEvent::uninstall_result(&app_id, None));
            }
            Err(err) => self
                .inner
                .emitter
                .emit(AppEvent::uninstall_result(&app_id, Some(err.user_message()))),
        }
        result
    }

    // ========== Shutdown ==========

    /// Cancel all syncs and installs and wait up to `grace` for them to end.
    ///
    /// Returns `false` when the grace period ran out first.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        info!("shutting down catalog controller");
        self.inner.shutdown.cancel();
        self.inner.tasks.close();
        let finished = tokio::time::timeout(grace, self.inner.tasks.wait())
            .await
            .is_ok();
        if !finished {
            warn!(grace_ms = grace.as_millis(), "background work still running after grace period");
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoopShortcuts;
    use crate::testing::{
        DirShortcuts, FakeCatalogSource, FakeDownload, FakeDownloader, RecordingEmitter,
        StaticInstalledIndex,
    };
    use tempfile::TempDir;

    const PAYLOAD: &[u8] = b"installer-bytes";

    struct Harness {
        controller: CatalogController,
        events: RecordingEmitter,
        _temp: TempDir,
    }

    fn harness_with(
        source: FakeCatalogSource,
        downloader: FakeDownloader,
        shortcuts: Option<&str>,
        fetch_limit: usize,
    ) -> Harness {
        let temp = TempDir::new().unwrap();
        let events = RecordingEmitter::new();
        let shortcuts: Arc<dyn ShortcutPort> = match shortcuts {
            Some(dir) => {
                let dir = temp.path().join(dir);
                std::fs::create_dir_all(&dir).unwrap();
                Arc::new(DirShortcuts::new(dir))
            }
            None => Arc::new(NoopShortcuts),
        };
        let controller = CatalogController::new(CatalogControllerDeps {
            source: Arc::new(source),
            downloader: Arc::new(downloader),
            os_index: Arc::new(StaticInstalledIndex::empty()),
            shortcuts,
            emitter: Arc::new(events.clone()),
            layout: InstallLayout::with_default_namespace(temp.path().join("data")),
            fetcher: FetcherConfig {
                max_concurrent_apps: fetch_limit,
                ..FetcherConfig::default()
            },
        });
        Harness {
            controller,
            events,
            _temp: temp,
        }
    }

    fn harness(source: FakeCatalogSource) -> Harness {
        harness_with(source, FakeDownloader::succeeding(PAYLOAD), None, 4)
    }

    fn finished_count(events: &RecordingEmitter) -> usize {
        events.count(|e| matches!(e, AppEvent::CatalogFinished { .. }))
    }

    #[tokio::test]
    async fn sync_publishes_manifests() {
        let h = harness(
            FakeCatalogSource::new()
                .with_app("Alpha", "Alpha App", &["a.zip"])
                .with_app("Beta", "Beta App", &[]),
        );
        let summary = h.controller.sync().await;

        assert_eq!(summary.ready, 2);
        assert_eq!(h.controller.entries().len(), 2);
        assert_eq!(h.controller.entry("Alpha").unwrap().name(), "Alpha App");
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::ManifestReady { .. })),
            2
        );
        assert_eq!(finished_count(&h.events), 1);
    }

    #[tokio::test]
    async fn skipped_app_does_not_block_finish() {
        let h = harness(
            FakeCatalogSource::new()
                .with_app("Foo", "Foo", &["foo.zip"])
                .with_app("Bar", "Bar", &["bar.zip"])
                .failing_path("Apps/Foo/Package"),
        );
        h.controller.sync().await;

        assert!(h.controller.entry("Foo").is_none());
        assert!(h.controller.entry("Bar").is_some());
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::AppSkipped { app_id, .. } if app_id == "Foo")),
            1
        );
        assert!(matches!(
            h.events.events().last(),
            Some(AppEvent::CatalogFinished { published: 1, skipped: 1, cancelled: false })
        ));
    }

    #[tokio::test]
    async fn unavailable_catalog_still_finishes_once() {
        let h = harness(FakeCatalogSource::new().failing_path("Apps"));
        h.controller.sync().await;

        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::CatalogError { .. })),
            1
        );
        assert_eq!(finished_count(&h.events), 1);
        assert!(h.controller.entries().is_empty());
    }

    #[tokio::test]
    async fn stop_sync_mid_traversal() {
        let mut source = FakeCatalogSource::new().with_delay(Duration::from_millis(5));
        for i in 0..5 {
            source = source.with_app(&format!("App{i}"), "x", &["a.zip"]);
        }
        let h = harness_with(source, FakeDownloader::succeeding(PAYLOAD), None, 1);

        let task = h.controller.start_sync();
        while h.events.count(|e| matches!(e, AppEvent::ManifestReady { .. })) < 2 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        h.controller.stop_sync();
        let summary = task.await.unwrap();
        let ready_at_stop = h.events.count(|e| matches!(e, AppEvent::ManifestReady { .. }));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(summary.cancelled);
        assert_eq!(finished_count(&h.events), 1);
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::ManifestReady { .. })),
            ready_at_stop
        );
        assert!(ready_at_stop < 5);
        assert!(matches!(h.events.events().last(), Some(AppEvent::CatalogFinished { .. })));
    }

    #[tokio::test]
    async fn resync_replaces_entries() {
        let h = harness(FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]));
        h.controller.sync().await;
        h.controller.sync().await;
        assert_eq!(h.controller.entries().len(), 1);
        assert_eq!(finished_count(&h.events), 2);
    }

    #[tokio::test]
    async fn find_by_id_or_name() {
        let h = harness(FakeCatalogSource::new().with_app("tool-x", "Tool X", &["t.zip"]));
        h.controller.sync().await;
        assert_eq!(h.controller.find("tool-x").unwrap().id(), "tool-x");
        assert_eq!(h.controller.find("tool x").unwrap().id(), "tool-x");
        assert_eq!(h.controller.find("TOOL-X").unwrap().id(), "tool-x");
        assert!(h.controller.find("nope").is_none());
    }

    #[tokio::test]
    async fn install_then_uninstall_round_trip() {
        let h = harness_with(
            FakeCatalogSource::new().with_app("Alpha", "Alpha App", &["a.zip"]),
            FakeDownloader::succeeding(PAYLOAD),
            Some("desktop"),
            4,
        );
        h.controller.sync().await;
        assert_eq!(h.controller.install_state("Alpha"), InstallState::NotInstalled);

        let outcome = h.controller.install("Alpha").await.unwrap();
        assert!(outcome.artifact_path.is_file());
        assert_eq!(h.controller.install_state("Alpha"), InstallState::Installed);
        assert!(h.controller.entry("Alpha").unwrap().installed);
        assert!(h.events.count(|e| matches!(e, AppEvent::DownloadProgress { .. })) > 0);
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::InstallResult { success: true, .. })),
            1
        );

        let shortcut = h.controller.create_shortcut("Alpha").unwrap();
        assert!(shortcut.exists());
        assert_eq!(
            h.controller.install_record("Alpha").unwrap().shortcut_path,
            Some(shortcut.clone())
        );

        let plan = h.controller.request_uninstall("Alpha").unwrap();
        h.controller.commit_uninstall(plan).await.unwrap();
        assert_eq!(h.controller.install_state("Alpha"), InstallState::NotInstalled);
        assert!(!shortcut.exists());
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::UninstallResult { success: true, .. })),
            1
        );
    }

    #[tokio::test]
    async fn install_unknown_and_uninstallable() {
        let h = harness(FakeCatalogSource::new().with_app("Bare", "Bare", &[]));
        h.controller.sync().await;

        assert!(matches!(
            h.controller.install("Ghost").await,
            Err(InstallError::UnknownApp { .. })
        ));
        assert!(matches!(
            h.controller.install("Bare").await,
            Err(InstallError::NoInstallableArtifact { .. })
        ));
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::InstallResult { success: false, .. })),
            2
        );
    }

    #[tokio::test]
    async fn cancel_install_reports_failure() {
        let h = harness_with(
            FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]),
            FakeDownloader::new(FakeDownload::Stall(PAYLOAD.to_vec())),
            None,
            4,
        );
        h.controller.sync().await;

        let task = h.controller.spawn_install("Alpha");
        while h.controller.install_state("Alpha") != InstallState::Installing {
            tokio::task::yield_now().await;
        }
        // Duplicate installs are refused while one is running.
        assert!(matches!(
            h.controller.install("Alpha").await,
            Err(InstallError::Busy { .. })
        ));
        assert!(h.controller.cancel_install("Alpha"));

        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(h.controller.install_state("Alpha"), InstallState::NotInstalled);
        assert!(!h.controller.cancel_install("Alpha"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_installs_admit_exactly_one() {
        let downloader = FakeDownloader::new(FakeDownload::Stall(PAYLOAD.to_vec()));
        let h = harness_with(
            FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]),
            downloader.clone(),
            None,
            4,
        );
        h.controller.sync().await;

        let barrier = Arc::new(tokio::sync::Barrier::new(2));
        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let controller = h.controller.clone();
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    controller.install("Alpha").await
                })
            })
            .collect();

        let refused = |e: &AppEvent| matches!(e, AppEvent::InstallResult { success: false, .. });
        while h.events.count(refused) == 0 || downloader.started() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(h.controller.cancel_install("Alpha"));

        let mut busy = 0;
        let mut cancelled = 0;
        for task in tasks {
            match task.await.unwrap() {
                Err(InstallError::Busy { .. }) => busy += 1,
                Err(err) if err.is_cancelled() => cancelled += 1,
                other => panic!("unexpected install result: {other:?}"),
            }
        }
        assert_eq!((busy, cancelled), (1, 1));
        assert_eq!(downloader.started(), 1);
    }

    #[tokio::test]
    async fn failed_reinstall_keeps_existing_artifact() {
        let h = harness_with(
            FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]),
            FakeDownloader::new(FakeDownload::FailMidway(
                PAYLOAD.to_vec(),
                crate::download::DownloadError::network("connection reset"),
            )),
            None,
            4,
        );
        let dir = h.controller.layout().install_dir_for("Alpha");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.zip"), b"working build").unwrap();
        h.controller.sync().await;
        assert_eq!(h.controller.install_state("Alpha"), InstallState::Installed);

        let err = h.controller.install("Alpha").await.unwrap_err();
        assert!(matches!(err, InstallError::InstallFailed { .. }));
        assert_eq!(std::fs::read(dir.join("a.zip")).unwrap(), b"working build");
        assert!(!dir.join("a.zip.part").exists());
        assert_eq!(h.controller.install_state("Alpha"), InstallState::Installed);
    }

    #[tokio::test]
    async fn shutdown_cancels_background_work() {
        let h = harness_with(
            FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]),
            FakeDownloader::new(FakeDownload::Stall(PAYLOAD.to_vec())),
            None,
            4,
        );
        h.controller.sync().await;
        let task = h.controller.spawn_install("Alpha");
        while h.controller.install_state("Alpha") != InstallState::Installing {
            tokio::task::yield_now().await;
        }

        assert!(h.controller.shutdown(SHUTDOWN_GRACE).await);
        assert!(task.await.unwrap().unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn shortcut_failure_emits_warning() {
        let h = harness(FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]));
        h.controller.sync().await;
        h.controller.install("Alpha").await.unwrap();

        assert!(h.controller.create_shortcut("Alpha").is_err());
        assert_eq!(
            h.events.count(|e| matches!(e, AppEvent::ShortcutWarning { .. })),
            1
        );
        assert_eq!(h.controller.install_state("Alpha"), InstallState::Installed);
    }

    #[tokio::test]
    async fn refresh_picks_up_external_removal() {
        let h = harness(FakeCatalogSource::new().with_app("Alpha", "Alpha", &["a.zip"]));
        h.controller.sync().await;
        h.controller.install("Alpha").await.unwrap();

        std::fs::remove_dir_all(h.controller.layout().install_dir_for("Alpha")).unwrap();
        assert!(h.controller.entry("Alpha").unwrap().installed);
        h.controller.refresh_installed();
        assert!(!h.controller.entry("Alpha").unwrap().installed);
    }
}
