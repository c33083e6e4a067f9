//! Uninstall command handler.
//!
//! Uninstall is two-phase: the controller validates and returns a plan,
//! the user confirms, then the plan is committed.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::utils::input;

use super::{find_app, report_shortcut_warnings, sync_catalog};

/// Execute the uninstall command.
///
/// # Arguments
///
/// * `ctx` - The CLI context
/// * `query` - Folder name or display name of the app
/// * `yes` - If true, skips the confirmation prompt
pub async fn execute(ctx: &mut CliContext, query: &str, yes: bool) -> Result<()> {
    sync_catalog(ctx).await?;
    let entry = find_app(ctx, query)?;
    let plan = ctx
        .controller()
        .request_uninstall(entry.id())
        .map_err(CliError::from)?;

    if !yes {
        println!("This will delete {}", plan.install_dir().display());
        let confirm = input::prompt_confirmation(&format!("Uninstall '{}'?", plan.app_name()))?;
        if !confirm {
            println!("Uninstall cancelled.");
            return Ok(());
        }
    }

    let outcome = ctx
        .controller()
        .commit_uninstall(plan)
        .await
        .map_err(CliError::from)?;
    report_shortcut_warnings(ctx);

    println!("✅ Uninstalled '{}'.", entry.name());
    if outcome.shortcut_removed {
        println!("Desktop shortcut removed.");
    }
    Ok(())
}
