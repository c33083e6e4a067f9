//! Downloader configuration.

use std::time::Duration;

/// Default number of downloads streaming at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default minimum spacing between progress events.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Default capacity of each handle's event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Settings for [`crate::StreamingDownloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// Downloads beyond this wait in `Pending` for a free slot.
    pub max_concurrent: usize,
    /// Minimum time between two `Progress` events of one download.
    pub progress_interval: Duration,
    /// Event buffer per download; a slow consumer applies backpressure.
    pub channel_capacity: usize,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl DownloaderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the per-download event buffer. Zero is treated as one.
    #[must_use]
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}
