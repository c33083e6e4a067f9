//! Command handlers that delegate to the catalog controller.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &mut CliContext, ...) -> Result<()>`
//! - Sync the catalog, resolve the app, call the controller, format output.
//!
//! Handlers should NOT touch the filesystem or the network directly.

pub mod install;
pub mod list;
pub mod paths;
pub mod shortcut;
pub mod show;
pub mod uninstall;

use anyhow::{Context, Result};
use ddp_core::{AppEvent, CatalogEntry, TraversalSummary};
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::catalog_spinner;

/// Run one catalog sync, reporting skipped apps on stderr.
///
/// Fails with [`CliError::Catalog`] when the catalog root is unreachable.
pub async fn sync_catalog(ctx: &mut CliContext) -> Result<TraversalSummary> {
    let spinner = catalog_spinner();
    let mut handle = ctx.controller.start_sync();
    let mut failure = None;
    let mut skipped = Vec::new();

    let mut on_event = |event: AppEvent| match event {
        AppEvent::ManifestReady { entry } => {
            spinner.set_message(format!("Fetched {}", entry.name()));
        }
        AppEvent::AppSkipped { app_id, message } => skipped.push((app_id, message)),
        AppEvent::CatalogError { message } => failure = Some(message),
        _ => {}
    };

    let summary = loop {
        tokio::select! {
            joined = &mut handle => break joined.context("catalog sync task failed")?,
            Some(event) = ctx.events.recv() => on_event(event),
        }
    };
    for event in ctx.drain_events() {
        on_event(event);
    }
    spinner.finish_and_clear();

    for (app_id, message) in &skipped {
        warn!(app_id = %app_id, "app skipped during sync");
        eprintln!("Skipped '{app_id}': {message}");
    }
    if let Some(message) = failure {
        return Err(CliError::Catalog(message).into());
    }
    Ok(summary)
}

/// Look an app up by folder name or display name.
pub fn find_app(ctx: &CliContext, query: &str) -> Result<CatalogEntry, CliError> {
    ctx.controller()
        .find(query)
        .ok_or_else(|| CliError::UnknownApp(query.to_string()))
}

/// Print any shortcut warnings still queued.
pub fn report_shortcut_warnings(ctx: &mut CliContext) {
    for event in ctx.drain_events() {
        if let AppEvent::ShortcutWarning { message, .. } = event {
            eprintln!("Warning: {message}");
        }
    }
}
