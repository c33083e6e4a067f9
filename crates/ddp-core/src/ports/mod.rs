//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or registry types in any signature
//! - Errors are port-level enums; adapters map their own errors into them
//! - Platform probes are synchronous, network ports are async

pub mod catalog_source;
pub mod downloader;
pub mod event_emitter;
pub mod installed_software;
pub mod shortcut;

pub use catalog_source::{
    CatalogPortError, CatalogPortResult, CatalogSourcePort, EntryKind, RemoteEntry,
};
pub use downloader::{DownloadHandle, DownloaderPort};
pub use event_emitter::{AppEventEmitter, ChannelEmitter, NoopEmitter};
pub use installed_software::{
    InstalledIndexError, InstalledSoftwarePort, UnsupportedInstalledIndex,
};
pub use shortcut::{NoopShortcuts, ShortcutError, ShortcutPort};
