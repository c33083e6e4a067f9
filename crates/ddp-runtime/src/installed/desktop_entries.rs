//! XDG `applications/*.desktop` index.

use std::path::{Path, PathBuf};

use ddp_core::ports::{InstalledIndexError, InstalledSoftwarePort};
use tracing::debug;

use super::normalize_names;

const DESKTOP_SECTION: &str = "Desktop Entry";

/// Reads the `Name` of every desktop entry in the XDG data directories.
#[derive(Debug, Clone, Default)]
pub struct DesktopEntryIndex {
    /// Explicit directories; `None` means the XDG search path.
    dirs: Option<Vec<PathBuf>>,
}

impl DesktopEntryIndex {
    /// Use `$XDG_DATA_HOME/applications` and each `$XDG_DATA_DIRS/applications`.
    pub const fn from_xdg() -> Self {
        Self { dirs: None }
    }

    /// Scan exactly these directories.
    pub const fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs: Some(dirs) }
    }

    fn entry_files(&self) -> Vec<PathBuf> {
        let files = match self.dirs {
            Some(ref dirs) => dirs.iter().flat_map(|dir| list_dir(dir)).collect(),
            None => xdg::BaseDirectories::with_prefix("applications").list_data_files(""),
        };
        files
            .into_iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == "desktop"))
            .collect()
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).map(|e| e.path()).collect())
        .unwrap_or_default()
}

/// `Name` of an entry, or `None` for unreadable or `Hidden=true` entries.
fn entry_name(path: &Path) -> Option<String> {
    let entry = match freedesktop_entry_parser::parse_entry(path) {
        Ok(ok) => ok,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "Skipping unreadable desktop entry");
            return None;
        }
    };

    let hidden = entry
        .get(DESKTOP_SECTION, "Hidden")
        .and_then(|attr| attr.first())
        .is_some_and(|value| value.trim() == "true");
    if hidden {
        return None;
    }

    entry
        .get(DESKTOP_SECTION, "Name")
        .and_then(|attr| attr.first())
        .map(ToString::to_string)
}

impl InstalledSoftwarePort for DesktopEntryIndex {
    fn display_names(&self) -> Result<Vec<String>, InstalledIndexError> {
        let files = self.entry_files();
        let names = normalize_names(files.iter().filter_map(|path| entry_name(path)));
        debug!(
            entries = files.len(),
            names = names.len(),
            "Scanned desktop entries"
        );
        Ok(names)
    }
}
