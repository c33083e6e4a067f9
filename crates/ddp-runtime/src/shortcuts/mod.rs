//! Desktop shortcut artifacts.
//!
//! One shortcut per app, in the user's Desktop directory, named after the
//! app's display name. Everything here is best effort: callers report
//! failures as warnings.

#[cfg(any(not(windows), test))]
mod desktop_file;
#[cfg(any(windows, test))]
mod lnk;

use std::path::{Path, PathBuf};

use ddp_core::paths::default_desktop_dir;
use ddp_core::ports::{ShortcutError, ShortcutPort};
use tracing::{debug, info};

/// File extension of the shortcuts this platform creates.
#[cfg(windows)]
pub const SHORTCUT_EXTENSION: &str = "lnk";
/// File extension of the shortcuts this platform creates.
#[cfg(not(windows))]
pub const SHORTCUT_EXTENSION: &str = "desktop";

const FALLBACK_STEM: &str = "App";

/// Characters Windows refuses in file names; replaced everywhere so the
/// same catalog yields the same shortcut names on every platform.
const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// File name of the shortcut for `app_name`.
pub fn shortcut_file_name(app_name: &str) -> String {
    format!("{}.{SHORTCUT_EXTENSION}", shortcut_stem(app_name))
}

fn shortcut_stem(app_name: &str) -> String {
    let replaced: String = app_name
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim().trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// [`ShortcutPort`] backed by a Desktop directory.
#[derive(Debug, Clone)]
pub struct DesktopShortcuts {
    desktop_dir: Option<PathBuf>,
}

impl DesktopShortcuts {
    pub const fn new(desktop_dir: Option<PathBuf>) -> Self {
        Self { desktop_dir }
    }

    /// The current user's Desktop, if the platform has one.
    pub fn for_current_user() -> Self {
        Self::new(default_desktop_dir())
    }

    pub fn desktop_dir(&self) -> Option<&Path> {
        self.desktop_dir.as_deref()
    }

    fn writable_path(&self, app_name: &str) -> Result<PathBuf, ShortcutError> {
        let dir = self
            .desktop_dir
            .as_deref()
            .filter(|dir| dir.is_dir())
            .ok_or(ShortcutError::NoDesktopDir)?;
        Ok(dir.join(shortcut_file_name(app_name)))
    }
}

#[cfg(windows)]
fn write_shortcut(path: &Path, _app_name: &str, target: &Path) -> Result<(), ShortcutError> {
    lnk::create_lnk(path, target)
}

#[cfg(not(windows))]
fn write_shortcut(path: &Path, app_name: &str, target: &Path) -> Result<(), ShortcutError> {
    desktop_file::write_desktop_file(path, app_name, target)
}

impl ShortcutPort for DesktopShortcuts {
    fn shortcut_path(&self, app_name: &str) -> Option<PathBuf> {
        self.desktop_dir
            .as_ref()
            .map(|dir| dir.join(shortcut_file_name(app_name)))
    }

    fn create(&self, app_name: &str, target: &Path) -> Result<PathBuf, ShortcutError> {
        let path = self.writable_path(app_name)?;
        write_shortcut(&path, app_name, target)?;
        info!(app = app_name, path = %path.display(), "Created shortcut");
        Ok(path)
    }

    fn remove(&self, app_name: &str) -> Result<bool, ShortcutError> {
        let Some(path) = self.shortcut_path(app_name) else {
            return Ok(false);
        };
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(app = app_name, path = %path.display(), "Removed shortcut");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ShortcutError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }
}
