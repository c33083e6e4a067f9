//! Installed-state classification for catalog manifests.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::domain::{AppManifest, InstallRecord};
use crate::paths::{InstallLayout, is_non_empty_dir};
use crate::ports::{InstalledSoftwarePort, ShortcutPort};

#[derive(Debug, Clone)]
enum OsSnapshot {
    NotQueried,
    /// The index could not be read; only the disk check counts.
    Unavailable,
    Names(HashSet<String>),
}

/// Decides whether a manifest counts as installed.
///
/// An app is installed when the OS index lists its exact display name, or
/// when its install directory is non-empty and holds the primary artifact.
/// OS index answers are cached until [`refresh`](Self::refresh).
pub struct InstalledStateIndex {
    layout: InstallLayout,
    os_index: Arc<dyn InstalledSoftwarePort>,
    snapshot: RwLock<OsSnapshot>,
}

impl InstalledStateIndex {
    pub fn new(layout: InstallLayout, os_index: Arc<dyn InstalledSoftwarePort>) -> Self {
        Self {
            layout,
            os_index,
            snapshot: RwLock::new(OsSnapshot::NotQueried),
        }
    }

    pub const fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    pub fn install_dir_for(&self, app_id: &str) -> PathBuf {
        self.layout.install_dir_for(app_id)
    }

    /// Expected local path of the primary artifact.
    pub fn primary_artifact_path(&self, manifest: &AppManifest) -> Option<PathBuf> {
        let artifact = manifest.primary_artifact()?;
        self.layout.artifact_path(&manifest.id, &artifact.file_name)
    }

    /// Re-query the OS index. A failure is logged and leaves only the disk check.
    pub fn refresh(&self) {
        let next = match self.os_index.display_names() {
            Ok(names) => {
                debug!(count = names.len(), "OS installed-software index loaded");
                OsSnapshot::Names(names.into_iter().collect())
            }
            Err(e) => {
                warn!(error = %e, "OS installed-software index unavailable");
                OsSnapshot::Unavailable
            }
        };
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    fn os_lists(&self, name: &str) -> bool {
        let needs_query = matches!(
            *self.snapshot.read().unwrap_or_else(PoisonError::into_inner),
            OsSnapshot::NotQueried
        );
        if needs_query {
            self.refresh();
        }
        match &*self.snapshot.read().unwrap_or_else(PoisonError::into_inner) {
            OsSnapshot::Names(names) => names.contains(name),
            OsSnapshot::NotQueried | OsSnapshot::Unavailable => false,
        }
    }

    /// Whether the app's files are on disk.
    pub fn has_local_install(&self, manifest: &AppManifest) -> bool {
        let dir = self.install_dir_for(&manifest.id);
        if !is_non_empty_dir(&dir) {
            return false;
        }
        self.primary_artifact_path(manifest)
            .is_some_and(|artifact| artifact.is_file())
    }

    pub fn is_installed(&self, manifest: &AppManifest) -> bool {
        self.os_lists(&manifest.name) || self.has_local_install(manifest)
    }

    pub fn record_for(&self, manifest: &AppManifest, shortcuts: &dyn ShortcutPort) -> InstallRecord {
        InstallRecord {
            app_id: manifest.id.clone(),
            install_dir: self.install_dir_for(&manifest.id),
            is_installed: self.is_installed(manifest),
            shortcut_path: shortcuts
                .shortcut_path(&manifest.name)
                .filter(|path| path.exists()),
        }
    }
}
