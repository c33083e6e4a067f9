//! Download domain types: ids, task snapshots, events and errors.

mod errors;
mod types;

pub use errors::{DownloadError, DownloadResult};
pub use types::{DownloadEvent, DownloadId, DownloadRequest, DownloadState, DownloadTask};
