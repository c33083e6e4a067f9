//! Core services that drive the catalog and install lifecycle.

mod catalog_controller;
mod install_manager;
mod installed_index;

pub use catalog_controller::{CatalogController, CatalogControllerDeps, SHUTDOWN_GRACE};
pub use install_manager::{InstallManager, InstallOutcome, UninstallOutcome, UninstallPlan};
pub use installed_index::InstalledStateIndex;
