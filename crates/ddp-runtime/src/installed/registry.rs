//! Windows `Uninstall` registry index.

use ddp_core::ports::{InstalledIndexError, InstalledSoftwarePort};
use tracing::debug;
use winreg::RegKey;
use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ};

use super::normalize_names;

const UNINSTALL_KEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
const UNINSTALL_KEY_WOW64: &str = r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall";

/// Reads `DisplayName` from every program registered for uninstall.
#[derive(Debug, Clone, Default)]
pub struct RegistryInstalledIndex;

impl RegistryInstalledIndex {
    pub const fn new() -> Self {
        Self
    }
}

fn collect_display_names(key: &RegKey, names: &mut Vec<String>) {
    for subkey_name in key.enum_keys().filter_map(Result::ok) {
        if let Ok(subkey) = key.open_subkey(&subkey_name) {
            if let Ok(name) = subkey.get_value::<String, _>("DisplayName") {
                names.push(name);
            }
        }
    }
}

impl InstalledSoftwarePort for RegistryInstalledIndex {
    fn display_names(&self) -> Result<Vec<String>, InstalledIndexError> {
        let roots = [
            (HKEY_LOCAL_MACHINE, UNINSTALL_KEY, "HKLM"),
            (HKEY_LOCAL_MACHINE, UNINSTALL_KEY_WOW64, "HKLM 32-bit"),
            (HKEY_CURRENT_USER, UNINSTALL_KEY, "HKCU"),
        ];

        let mut names = Vec::new();
        let mut opened = 0usize;
        for (hive, path, label) in roots {
            match RegKey::predef(hive).open_subkey_with_flags(path, KEY_READ) {
                Ok(key) => {
                    opened += 1;
                    let before = names.len();
                    collect_display_names(&key, &mut names);
                    debug!(hive = label, count = names.len() - before, "Scanned uninstall key");
                }
                Err(e) => debug!(hive = label, error = %e, "Uninstall key not readable"),
            }
        }

        if opened == 0 {
            return Err(InstalledIndexError::QueryFailed {
                message: "no Uninstall registry key could be opened".to_string(),
            });
        }
        Ok(normalize_names(names))
    }
}
