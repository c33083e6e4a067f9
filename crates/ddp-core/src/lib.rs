#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod domain;
pub mod download;
pub mod events;
pub mod install;
pub mod manifest;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use catalog::{
    CatalogError, FetcherConfig, RemoteTreeFetcher, TraversalEvent, TraversalSummary,
};
pub use domain::{
    AppListing, AppManifest, CatalogEntry, InfoFile, InstallRecord, InstallState, PackageFile,
    UNKNOWN_APP_NAME,
};
pub use download::{
    DownloadError, DownloadEvent, DownloadId, DownloadRequest, DownloadResult, DownloadState,
    DownloadTask,
};
pub use events::AppEvent;
pub use install::{InstallError, InstallResult};
pub use manifest::{Extras, assemble_listing, parse_extras, serialize_extras};
pub use paths::{InstallLayout, PathError, sanitize_folder_name};
pub use ports::{
    AppEventEmitter, CatalogPortError, CatalogPortResult, CatalogSourcePort, ChannelEmitter,
    DownloadHandle, DownloaderPort, EntryKind, InstalledIndexError, InstalledSoftwarePort,
    NoopEmitter, NoopShortcuts, RemoteEntry, ShortcutError, ShortcutPort, UnsupportedInstalledIndex,
};
pub use services::{
    CatalogController, CatalogControllerDeps, InstallManager, InstallOutcome,
    InstalledStateIndex, SHUTDOWN_GRACE, UninstallOutcome, UninstallPlan,
};
pub use settings::{SettingsError, StoreSettings, validate_settings};
