//! Path utilities for the store's data, config and install locations.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - OS-specific lookups are kept in `platform`

mod ensure;
mod error;
mod layout;
mod platform;
mod resolver;
mod sanitize;

#[cfg(test)]
mod test_utils;

pub use ensure::{ensure_directory, is_non_empty_dir};
pub use error::PathError;
pub use layout::{DEFAULT_NAMESPACE, InstallLayout, is_plain_file_name};
pub use platform::{
    config_root, default_app_data_root, default_desktop_dir, normalize_user_path, settings_path,
};
pub use resolver::{
    APP_DATA_ENV_VAR, AppDataRootResolution, AppDataRootSource, resolve_app_data_root,
};
pub use sanitize::sanitize_folder_name;
