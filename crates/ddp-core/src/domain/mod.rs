//! Plain domain records shared by every layer.
//!
//! Nothing in here performs I/O.

mod install;
mod listing;
mod manifest;

pub use install::{CatalogEntry, InstallRecord, InstallState};
pub use listing::{AppListing, InfoFile};
pub use manifest::{AppManifest, PackageFile, UNKNOWN_APP_NAME};
