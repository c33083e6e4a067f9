//! Root CLI parser and global options.

use clap::Parser;

use crate::commands::Commands;

/// Browse and install apps from a DDP catalog repository.
#[derive(Parser, Debug)]
#[command(name = "ddp")]
#[command(about = "Browse and install apps from a DDP catalog repository")]
#[command(version)]
pub struct Cli {
    /// Owner of the catalog repository
    #[arg(long, global = true, env = "DDP_CATALOG_OWNER")]
    pub owner: Option<String>,

    /// Name of the catalog repository
    #[arg(long, global = true, env = "DDP_CATALOG_REPO")]
    pub repo: Option<String>,

    /// Branch, tag or commit to read the catalog from
    #[arg(long = "git-ref", global = true)]
    pub git_ref: Option<String>,

    /// Override the app data root for this invocation
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// GitHub token for private catalogs or higher rate limits
    #[arg(long, global = true, env = "DDP_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
