//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms beyond picking
//! fallback text.

pub mod app_display;
pub mod progress;
pub mod tables;

pub use app_display::{
    CatalogRow, NO_DESCRIPTION, NO_DETAILS, UNAVAILABLE, render_app_details, render_catalog_table,
};
pub use progress::{InstallProgress, catalog_spinner};
pub use tables::{format_optional, format_size, truncate_string};
