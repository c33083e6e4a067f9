//! Show command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::render_app_details;

use super::{find_app, sync_catalog};

pub async fn execute(ctx: &mut CliContext, query: &str) -> Result<()> {
    sync_catalog(ctx).await?;
    let entry = find_app(ctx, query)?;
    let controller = ctx.controller();
    let state = controller.install_state(entry.id());
    let record = controller.install_record(entry.id());
    print!("{}", render_app_details(&entry.manifest, state, record.as_ref()));
    Ok(())
}
