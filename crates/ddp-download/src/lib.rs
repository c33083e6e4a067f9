#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

// Re-export core types for convenience
pub use ddp_core::download::{
    DownloadError, DownloadEvent, DownloadId, DownloadRequest, DownloadState, DownloadTask,
};
pub use ddp_core::ports::{DownloadHandle, DownloaderPort};

mod config;
pub(crate) mod progress;
mod source;
mod manager;

pub use config::DownloaderConfig;
pub use manager::StreamingDownloader;
pub use progress::ProgressThrottle;
pub use source::{ByteSource, ByteStream, RemoteBody, ReqwestSource};

