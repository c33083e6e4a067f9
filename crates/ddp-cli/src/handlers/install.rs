//! Install command handler.
//!
//! Runs the install as a controller-tracked task so Ctrl-C can shut the
//! controller down and let the downloader clean up its partial file.

use anyhow::{Context, Result};
use ddp_core::{AppEvent, SHUTDOWN_GRACE};

use crate::bootstrap::CliContext;
use crate::commands::ShortcutChoice;
use crate::error::CliError;
use crate::presentation::InstallProgress;
use crate::utils::input;

use super::{find_app, report_shortcut_warnings, sync_catalog};

/// Execute the install command.
///
/// # Arguments
///
/// * `ctx` - The CLI context
/// * `query` - Folder name or display name of the app
/// * `shortcut` - Whether to create a desktop shortcut, or ask
pub async fn execute(ctx: &mut CliContext, query: &str, shortcut: ShortcutChoice) -> Result<()> {
    sync_catalog(ctx).await?;
    let entry = find_app(ctx, query)?;
    let app_id = entry.id().to_string();

    if entry.installed {
        println!("'{}' is already installed.", entry.name());
        println!("Use 'ddp uninstall {app_id}' to remove it first.");
        return Ok(());
    }

    let expected = entry
        .manifest
        .primary_artifact()
        .map_or(0, |file| file.size_bytes);
    let mut progress = InstallProgress::new(entry.name(), expected);
    let mut handle = ctx.controller().spawn_install(&app_id);
    let mut interrupted = false;

    let result = loop {
        tokio::select! {
            joined = &mut handle => break joined.context("install task failed")?,
            Some(event) = ctx.events.recv() => {
                if let AppEvent::DownloadProgress { app_id: id, downloaded, total } = event {
                    if id == app_id {
                        progress.update(downloaded, total);
                    }
                }
            }
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                progress.note("Cancelling install...");
                if !ctx.controller().shutdown(SHUTDOWN_GRACE).await {
                    progress.abandon("Interrupted");
                    return Err(CliError::Interrupted.into());
                }
            }
        }
    };
    ctx.drain_events();

    let outcome = match result {
        Ok(outcome) => {
            progress.finish();
            outcome
        }
        Err(err) if err.is_cancelled() && interrupted => {
            progress.abandon("Cancelled");
            return Err(CliError::Interrupted.into());
        }
        Err(err) => {
            progress.abandon("Failed");
            return Err(CliError::from(err).into());
        }
    };

    println!(
        "✅ Installed '{}' to {}",
        entry.name(),
        outcome.artifact_path.display()
    );

    let create = match shortcut.choice() {
        Some(choice) => choice,
        None => input::prompt_confirmation("Create a desktop shortcut?")?,
    };
    if create {
        match ctx.controller().create_shortcut(&app_id) {
            Ok(path) => println!("Shortcut created: {}", path.display()),
            Err(_) => report_shortcut_warnings(ctx),
        }
    }
    Ok(())
}
