//! Subcommands of the `ddp` binary.

use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every app in the catalog
    List {
        /// Print the catalog as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the details of one app
    Show {
        /// App folder name or display name
        app: String,
    },

    /// Download and install an app
    Install {
        /// App folder name or display name
        app: String,
        #[command(flatten)]
        shortcut: ShortcutChoice,
    },

    /// Remove an installed app and its desktop shortcut
    Uninstall {
        /// App folder name or display name
        app: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a desktop shortcut for an installed app
    Shortcut {
        /// App folder name or display name
        app: String,
    },

    /// Show resolved paths and catalog settings
    Paths,
}

/// Whether to create a desktop shortcut after installing.
///
/// Neither flag means "ask".
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ShortcutChoice {
    /// Create a desktop shortcut without asking
    #[arg(long, conflicts_with = "no_shortcut")]
    pub shortcut: bool,

    /// Never create a desktop shortcut
    #[arg(long = "no-shortcut")]
    pub no_shortcut: bool,
}

impl ShortcutChoice {
    /// `Some(decision)` when a flag was given, `None` to prompt.
    pub const fn choice(self) -> Option<bool> {
        if self.shortcut {
            Some(true)
        } else if self.no_shortcut {
            Some(false)
        } else {
            None
        }
    }
}
