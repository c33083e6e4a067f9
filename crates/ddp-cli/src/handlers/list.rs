//! List command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::presentation::{CatalogRow, render_catalog_table};

use super::sync_catalog;

/// Sync the catalog and print every published app.
pub async fn execute(ctx: &mut CliContext, json: bool) -> Result<()> {
    let summary = sync_catalog(ctx).await?;
    let entries = ctx.controller().entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No apps found in the catalog.");
        return Ok(());
    }

    let rows: Vec<CatalogRow> = entries
        .iter()
        .map(|entry| CatalogRow::new(entry, ctx.controller().install_state(entry.id())))
        .collect();
    print!("{}", render_catalog_table(&rows));

    println!();
    if summary.skipped > 0 {
        println!("{} app(s), {} skipped.", entries.len(), summary.skipped);
    } else {
        println!("{} app(s).", entries.len());
    }
    Ok(())
}
