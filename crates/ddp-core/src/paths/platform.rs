//! Platform directory lookups.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

const CONFIG_DIR_NAME: &str = "ddp-store";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Per-user local application data directory (`%LOCALAPPDATA%`,
/// `~/.local/share`, `~/Library/Application Support`).
pub fn default_app_data_root() -> Result<PathBuf, PathError> {
    dirs::data_local_dir().ok_or(PathError::NoDataDir)
}

/// Directory holding the store's own configuration.
pub fn config_root() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or(PathError::NoConfigDir)
}

pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(config_root()?.join(SETTINGS_FILE_NAME))
}

/// The user's desktop, falling back to `~/Desktop`.
pub fn default_desktop_dir() -> Option<PathBuf> {
    dirs::desktop_dir().or_else(|| dirs::home_dir().map(|home| home.join("Desktop")))
}

/// Expand `~` and make a user-supplied path absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
