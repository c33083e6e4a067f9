#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod installed;
pub mod shortcuts;

pub use installed::platform_installed_index;
pub use shortcuts::{DesktopShortcuts, SHORTCUT_EXTENSION, shortcut_file_name};

#[cfg(all(unix, not(target_os = "macos")))]
pub use installed::DesktopEntryIndex;
#[cfg(windows)]
pub use installed::RegistryInstalledIndex;
