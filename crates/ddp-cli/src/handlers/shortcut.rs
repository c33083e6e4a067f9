//! Shortcut command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;

use super::{find_app, sync_catalog};

/// Create (or replace) the desktop shortcut of an installed app.
pub async fn execute(ctx: &mut CliContext, query: &str) -> Result<()> {
    sync_catalog(ctx).await?;
    let entry = find_app(ctx, query)?;
    let path = ctx
        .controller()
        .create_shortcut(entry.id())
        .map_err(CliError::from)?;
    ctx.drain_events();
    println!("✅ Shortcut created: {}", path.display());
    Ok(())
}
