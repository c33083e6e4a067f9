//! Terminal progress bars for catalog syncs and installs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("█▓░"))
}

/// Spinner shown while the catalog is fetched.
pub fn catalog_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_message("Fetching catalog...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Download progress for one install.
///
/// Starts as a spinner and switches to a byte bar once a total is known.
pub struct InstallProgress {
    bar: ProgressBar,
    has_length: bool,
}

impl InstallProgress {
    pub fn new(app_name: &str, expected_total: u64) -> Self {
        let bar = if expected_total > 0 {
            let bar = ProgressBar::new(expected_total);
            bar.set_style(bar_style());
            bar
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(format!("Installing {app_name}"));
        Self {
            bar,
            has_length: expected_total > 0,
        }
    }

    /// Apply a progress event. `total` is `0` when unknown.
    pub fn update(&mut self, downloaded: u64, total: u64) {
        if total > 0 {
            if !self.has_length {
                self.bar.disable_steady_tick();
                self.bar.set_style(bar_style());
                self.has_length = true;
            }
            self.bar.set_length(total);
        }
        self.bar.set_position(downloaded);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Print a line above the bar.
    pub fn note(&self, message: &str) {
        self.bar.println(message);
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn abandon(self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}
