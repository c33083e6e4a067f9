use std::path::{Component, Path, PathBuf};

use super::sanitize::sanitize_folder_name;

/// Folder under the app data root that holds every installed app.
pub const DEFAULT_NAMESPACE: &str = "DDPApps";

/// Characters that are never allowed in a package file name. `:` covers
/// Windows drive prefixes and NTFS alternate data streams.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// A bare file name: exactly one normal path component, no reserved
/// characters.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains(RESERVED) || name.chars().any(char::is_control) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Resolves per-app install locations: `<root>/<namespace>/<folder>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    app_data_root: PathBuf,
    namespace: String,
}

impl InstallLayout {
    pub fn new(app_data_root: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            app_data_root: app_data_root.into(),
            namespace: namespace.into(),
        }
    }

    pub fn with_default_namespace(app_data_root: impl Into<PathBuf>) -> Self {
        Self::new(app_data_root, DEFAULT_NAMESPACE)
    }

    pub fn app_data_root(&self) -> &Path {
        &self.app_data_root
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn install_root(&self) -> PathBuf {
        self.app_data_root.join(&self.namespace)
    }

    /// Deterministic: the same id always yields the same directory.
    pub fn install_dir_for(&self, app_id: &str) -> PathBuf {
        self.install_root().join(sanitize_folder_name(app_id))
    }

    /// Local path of a package file. `None` when the remote name is not a
    /// plain file name.
    pub fn artifact_path(&self, app_id: &str, file_name: &str) -> Option<PathBuf> {
        is_plain_file_name(file_name).then(|| self.install_dir_for(app_id).join(file_name))
    }
}
