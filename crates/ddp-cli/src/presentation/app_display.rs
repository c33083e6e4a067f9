//! Catalog table and app detail rendering.
//!
//! Functions here return strings so handlers decide where output goes.

use std::fmt::Write as _;

use ddp_core::{AppManifest, CatalogEntry, InstallRecord, InstallState};

use super::tables::{format_optional, format_size, truncate_string};

pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_DETAILS: &str = "No additional details available.";
/// Shown in place of an install action for apps without package files.
pub const UNAVAILABLE: &str = "Unavailable";

const TABLE_WIDTH: usize = 86;

/// One line of the catalog table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub name: String,
    pub id: String,
    pub version: Option<String>,
    pub status: String,
    pub size: u64,
}

impl CatalogRow {
    pub fn new(entry: &CatalogEntry, state: InstallState) -> Self {
        let status = if entry.manifest.is_installable() || state != InstallState::NotInstalled {
            state.to_string()
        } else {
            UNAVAILABLE.to_string()
        };
        Self {
            name: entry.name().to_string(),
            id: entry.id().to_string(),
            version: entry.manifest.version().map(ToString::to_string),
            status,
            size: entry.manifest.total_package_bytes(),
        }
    }
}

pub fn render_catalog_table(rows: &[CatalogRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:<20} {:<10} {:<14} {:>10}",
        "Name", "Folder", "Version", "Status", "Size"
    );
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));
    for row in rows {
        let _ = writeln!(
            out,
            "{:<28} {:<20} {:<10} {:<14} {:>10}",
            truncate_string(&row.name, 27),
            truncate_string(&row.id, 19),
            truncate_string(&format_optional(row.version.as_deref(), "--"), 9),
            row.status,
            format_size(row.size),
        );
    }
    out
}

/// Full detail view for one app.
pub fn render_app_details(
    manifest: &AppManifest,
    state: InstallState,
    record: Option<&InstallRecord>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", manifest.name);
    let _ = writeln!(out, "{}", "=".repeat(manifest.name.chars().count().max(3)));
    if let Some(version) = manifest.version() {
        let _ = writeln!(out, "Version {version}");
    }
    let _ = writeln!(out, "Folder:  {}", manifest.id);
    let _ = writeln!(out, "Status:  {state}");

    let _ = writeln!(out, "\nDescription");
    let description = manifest.description.trim();
    if description.is_empty() {
        let _ = writeln!(out, "  {NO_DESCRIPTION}");
    } else {
        for line in description.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }

    let _ = writeln!(out, "\nDetails");
    let mut extras = manifest.detail_extras().peekable();
    if extras.peek().is_none() {
        let _ = writeln!(out, "  {NO_DETAILS}");
    }
    for (key, value) in extras {
        let _ = writeln!(out, "  {key}: {value}");
    }

    let _ = writeln!(out);
    match manifest.primary_artifact() {
        Some(file) => {
            let _ = writeln!(out, "Package: {} ({})", file.file_name, format_size(file.size_bytes));
        }
        None => {
            let _ = writeln!(out, "Package: {UNAVAILABLE}");
        }
    }
    if !manifest.screenshot_refs.is_empty() {
        let _ = writeln!(out, "Screenshots: {}", manifest.screenshot_refs.len());
    }

    if let Some(record) = record.filter(|record| record.is_installed) {
        let _ = writeln!(out, "Installed in: {}", record.install_dir.display());
        if let Some(shortcut) = &record.shortcut_path {
            let _ = writeln!(out, "Shortcut:     {}", shortcut.display());
        }
    }
    out
}
