//! App data root resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;
use super::platform::{default_app_data_root, normalize_user_path};

/// Environment variable overriding the app data root.
pub const APP_DATA_ENV_VAR: &str = "DDP_DATA_DIR";

/// How the app data root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppDataRootSource {
    /// Passed explicitly (CLI flag).
    Explicit,
    /// `DDP_DATA_DIR` from the environment or `.env`.
    EnvVar,
    /// Saved in the settings file.
    Settings,
    /// Platform local data directory.
    Default,
}

impl AppDataRootSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "flag",
            Self::EnvVar => "environment",
            Self::Settings => "settings file",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppDataRootResolution {
    pub path: PathBuf,
    pub source: AppDataRootSource,
}

/// Resolve the app data root.
///
/// Resolution order:
/// 1. Explicit path provided by caller
/// 2. `DDP_DATA_DIR` environment variable
/// 3. Path saved in settings
/// 4. Platform local data directory
pub fn resolve_app_data_root(
    explicit: Option<&str>,
    configured: Option<&Path>,
) -> Result<AppDataRootResolution, PathError> {
    if let Some(path_str) = explicit {
        return Ok(AppDataRootResolution {
            path: normalize_user_path(path_str)?,
            source: AppDataRootSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(APP_DATA_ENV_VAR) {
        if !env_path.trim().is_empty() {
            return Ok(AppDataRootResolution {
                path: normalize_user_path(&env_path)?,
                source: AppDataRootSource::EnvVar,
            });
        }
    }

    if let Some(path) = configured {
        return Ok(AppDataRootResolution {
            path: path.to_path_buf(),
            source: AppDataRootSource::Settings,
        });
    }

    Ok(AppDataRootResolution {
        path: default_app_data_root()?,
        source: AppDataRootSource::Default,
    })
}
