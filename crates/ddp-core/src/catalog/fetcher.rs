//! Catalog traversal over a [`CatalogSourcePort`].
//!
//! Lists the catalog root, then fetches every app directory's `Info/`,
//! `Images/` and `Package/` listings plus the recognised info texts. Apps are
//! fetched with bounded parallelism and reported as they complete.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{AppListing, InfoFile};
use crate::manifest::{app_id_from_path, is_recognized_info_file};
use crate::ports::{CatalogPortError, CatalogPortResult, CatalogSourcePort, RemoteEntry};
use crate::settings::{DEFAULT_CATALOG_ROOT, DEFAULT_MAX_CONCURRENT_APP_FETCHES};

use super::CatalogError;

pub const INFO_DIR: &str = "Info";
pub const IMAGES_DIR: &str = "Images";
pub const PACKAGE_DIR: &str = "Package";

/// Traversal tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Path of the catalog root inside the repository.
    pub catalog_root: String,
    /// Apps fetched in parallel.
    pub max_concurrent_apps: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            catalog_root: DEFAULT_CATALOG_ROOT.to_string(),
            max_concurrent_apps: DEFAULT_MAX_CONCURRENT_APP_FETCHES,
        }
    }
}

/// Per-app outcome delivered while a traversal runs.
#[derive(Debug, Clone)]
pub enum TraversalEvent {
    AppReady(AppListing),
    /// Always `CatalogError::AppFetchSkipped`.
    AppSkipped(CatalogError),
}

/// Counts for one finished traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalSummary {
    pub discovered: usize,
    pub ready: usize,
    pub skipped: usize,
    pub cancelled: bool,
}

/// Walks the remote catalog tree.
pub struct RemoteTreeFetcher {
    source: Arc<dyn CatalogSourcePort>,
    config: FetcherConfig,
}

fn join_path(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}/{child}")
    }
}

impl RemoteTreeFetcher {
    pub fn new(source: Arc<dyn CatalogSourcePort>, config: FetcherConfig) -> Self {
        Self { source, config }
    }

    pub const fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Paths of all app directories under the catalog root.
    pub async fn list_catalog(&self) -> Result<Vec<String>, CatalogError> {
        let entries = self
            .source
            .list_directory(&self.config.catalog_root)
            .await
            .map_err(|e| {
                tracing::error!(root = %self.config.catalog_root, error = %e, "catalog root listing failed");
                CatalogError::unavailable(&e)
            })?;

        Ok(entries
            .into_iter()
            .filter(RemoteEntry::is_directory)
            .map(|entry| {
                if entry.path.is_empty() {
                    join_path(&self.config.catalog_root, &entry.name)
                } else {
                    entry.path
                }
            })
            .collect())
    }

    pub async fn list_directory(&self, path: &str) -> CatalogPortResult<Vec<RemoteEntry>> {
        self.source.list_directory(path).await
    }

    /// Fetch a text file, replacing invalid UTF-8.
    pub async fn fetch_text(&self, locator: &str) -> CatalogPortResult<String> {
        let bytes = self.source.fetch_content(locator).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Fetch everything needed to assemble one app's manifest.
    ///
    /// Any failed listing or info fetch skips the whole app.
    pub async fn fetch_app(&self, app_path: &str) -> Result<AppListing, CatalogError> {
        let app_id = app_id_from_path(app_path);
        let skipped = |e: CatalogPortError| {
            warn!(app_id = %app_id, error = %e, "skipping app");
            CatalogError::skipped(app_id.clone(), &e)
        };

        let info_path = join_path(app_path, INFO_DIR);
        let images_path = join_path(app_path, IMAGES_DIR);
        let package_path = join_path(app_path, PACKAGE_DIR);
        let (info_entries, image_entries, package_entries) = tokio::try_join!(
            self.list_directory(&info_path),
            self.list_directory(&images_path),
            self.list_directory(&package_path),
        )
        .map_err(skipped)?;

        let mut info_files = Vec::new();
        for entry in info_entries
            .iter()
            .filter(|e| e.is_file() && is_recognized_info_file(&e.name))
        {
            let content = self.fetch_text(entry.locator()).await.map_err(skipped)?;
            info_files.push(InfoFile {
                name: entry.name.clone(),
                content,
            });
        }

        debug!(
            app_id = %app_id,
            info = info_files.len(),
            images = image_entries.len(),
            packages = package_entries.len(),
            "fetched app listing"
        );

        Ok(AppListing {
            app_id,
            app_path: app_path.to_string(),
            info_files,
            image_entries,
            package_entries,
        })
    }

    /// Run a full traversal, calling `on_event` for each app as it completes.
    ///
    /// Returns `Err` only when the catalog root cannot be listed. Once
    /// `cancel` fires no new requests are issued, in-flight ones are dropped
    /// and `on_event` is not called again.
    pub async fn traverse<F>(
        &self,
        cancel: &CancellationToken,
        mut on_event: F,
    ) -> Result<TraversalSummary, CatalogError>
    where
        F: FnMut(TraversalEvent),
    {
        let mut summary = TraversalSummary::default();

        let app_paths = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                summary.cancelled = true;
                return Ok(summary);
            }
            listed = self.list_catalog() => listed?,
        };
        summary.discovered = app_paths.len();
        info!(apps = summary.discovered, root = %self.config.catalog_root, "catalog listed");

        let limit = self.config.max_concurrent_apps.max(1);
        let this = self;
        let mut pending = stream::iter(app_paths)
            .map(move |path| async move { this.fetch_app(&path).await })
            .buffer_unordered(limit);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                next = pending.next() => match next {
                    Some(Ok(listing)) => {
                        summary.ready += 1;
                        on_event(TraversalEvent::AppReady(listing));
                    }
                    Some(Err(err)) => {
                        summary.skipped += 1;
                        on_event(TraversalEvent::AppSkipped(err));
                    }
                    None => break,
                },
            }
        }

        if summary.cancelled {
            info!(ready = summary.ready, "catalog traversal cancelled");
        } else {
            info!(ready = summary.ready, skipped = summary.skipped, "catalog traversal finished");
        }
        Ok(summary)
    }
}
