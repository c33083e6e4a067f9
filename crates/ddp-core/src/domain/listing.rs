use serde::{Deserialize, Serialize};

use crate::ports::RemoteEntry;

/// A fetched text file from an app's `Info/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoFile {
    pub name: String,
    pub content: String,
}

/// Raw per-app data gathered by one traversal, before assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppListing {
    /// Folder name of the app inside the catalog root.
    pub app_id: String,
    /// Full remote path of the app directory.
    pub app_path: String,
    /// Recognised info files with their contents, in listing order.
    pub info_files: Vec<InfoFile>,
    pub image_entries: Vec<RemoteEntry>,
    pub package_entries: Vec<RemoteEntry>,
}

impl AppListing {
    pub fn new(app_id: impl Into<String>, app_path: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_path: app_path.into(),
            info_files: Vec::new(),
            image_entries: Vec::new(),
            package_entries: Vec::new(),
        }
    }
}
