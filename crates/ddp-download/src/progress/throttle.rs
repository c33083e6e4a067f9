//! Progress throttling.
//!
//! Rate-limits progress updates so a fast stream does not flood the event
//! channel. Uses Tokio's clock so paused-time tests are deterministic.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::DEFAULT_PROGRESS_INTERVAL;

/// Rate-limiter for the progress of one download.
///
/// The first value is always let through; the caller is expected to check
/// [`ProgressThrottle::is_pending`] at the end so the final value is never
/// swallowed.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    last_value: Option<u64>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            last_value: None,
            min_interval,
        }
    }

    /// Decide whether `downloaded` should be reported now, recording it if so.
    pub fn should_emit(&mut self, downloaded: u64) -> bool {
        let now = Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                self.last_value = Some(downloaded);
                true
            }
        }
    }

    /// Whether `downloaded` differs from the last reported value.
    pub fn is_pending(&self, downloaded: u64) -> bool {
        self.last_value != Some(downloaded)
    }

    /// Record an out-of-band emission (e.g. the forced final value).
    pub fn mark_emitted(&mut self, downloaded: u64) {
        self.last_emit = Some(Instant::now());
        self.last_value = Some(downloaded);
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}
