//! Builds [`AppManifest`]s from an app's `Info/`, `Images/` and `Package/`
//! listings. File names are matched case-insensitively.

use crate::domain::{AppListing, AppManifest, InfoFile, PackageFile};
use crate::ports::RemoteEntry;

use super::extras::parse_extras;

pub const NAME_FILE: &str = "name.txt";
pub const DESCRIPTION_FILE: &str = "description.txt";
pub const EXTRA_FILE: &str = "extra.txt";
pub const LOGO_FILE: &str = "logo.png";
pub const BANNER_FILE: &str = "banner.png";

const SCREENSHOT_PREFIX: &str = "screen";
const SCREENSHOT_SUFFIX: &str = ".png";

/// Whether an `Info/` file is one the assembler reads.
pub fn is_recognized_info_file(name: &str) -> bool {
    [NAME_FILE, DESCRIPTION_FILE, EXTRA_FILE]
        .iter()
        .any(|known| name.eq_ignore_ascii_case(known))
}

/// `screen*.png`, any case.
pub fn is_screenshot(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with(SCREENSHOT_PREFIX) && lower.ends_with(SCREENSHOT_SUFFIX)
}

/// Last non-empty segment of a remote path.
pub fn app_id_from_path(path: &str) -> String {
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
        .to_string()
}

fn find_info<'a>(info_files: &'a [InfoFile], wanted: &str) -> Option<&'a str> {
    info_files
        .iter()
        .find(|file| file.name.eq_ignore_ascii_case(wanted))
        .map(|file| file.content.as_str())
}

fn find_image(images: &[RemoteEntry], wanted: &str) -> Option<String> {
    images
        .iter()
        .filter(|entry| entry.is_file())
        .find(|entry| entry.name.eq_ignore_ascii_case(wanted))
        .map(|entry| entry.locator().to_string())
}

/// Assemble a manifest. Missing pieces fall back to defaults; this never fails.
pub fn assemble(
    app_id: &str,
    info_files: &[InfoFile],
    image_entries: &[RemoteEntry],
    package_entries: &[RemoteEntry],
) -> AppManifest {
    let mut manifest = AppManifest::new(app_id);

    if let Some(name) = find_info(info_files, NAME_FILE) {
        let name = name.trim();
        if !name.is_empty() {
            manifest.name = name.to_string();
        }
    }
    if let Some(description) = find_info(info_files, DESCRIPTION_FILE) {
        manifest.description = description.trim().to_string();
    }
    if let Some(extra) = find_info(info_files, EXTRA_FILE) {
        manifest.extras = parse_extras(extra);
    }

    manifest.logo_ref = find_image(image_entries, LOGO_FILE);
    manifest.banner_ref = find_image(image_entries, BANNER_FILE);
    manifest.screenshot_refs = image_entries
        .iter()
        .filter(|entry| entry.is_file() && is_screenshot(&entry.name))
        .map(|entry| entry.locator().to_string())
        .collect();

    manifest.package_files = package_entries
        .iter()
        .filter(|entry| entry.is_file())
        .map(|entry| PackageFile {
            file_name: entry.name.clone(),
            source_locator: entry.locator().to_string(),
            size_bytes: entry.size,
        })
        .collect();

    manifest
}

/// Assemble from a fetched listing.
pub fn assemble_listing(listing: &AppListing) -> AppManifest {
    assemble(
        &listing.app_id,
        &listing.info_files,
        &listing.image_entries,
        &listing.package_entries,
    )
}
