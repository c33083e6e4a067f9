//! CLI-specific error types and exit code mapping.

use ddp_core::{InstallError, PathError, SettingsError};
use ddp_github::ClientBuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog root could not be listed.
    #[error("Catalog unavailable: {0}")]
    Catalog(String),

    /// No catalog entry matched the user's query.
    #[error("No app matching '{0}' in the catalog. Use 'ddp list' to see available apps.")]
    UnknownApp(String),

    #[error("{0}")]
    Install(String),

    #[error("Invalid arguments: {0}")]
    Arguments(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Ctrl-C arrived and background work did not stop in time.
    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    /// Map error to a process exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Catalog(_) => 69,    // EX_UNAVAILABLE
            Self::UnknownApp(_) => 65, // EX_DATAERR
            Self::Install(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Interrupted => 130,
        }
    }
}

impl From<InstallError> for CliError {
    fn from(err: InstallError) -> Self {
        match err {
            InstallError::UnknownApp { app_id } => Self::UnknownApp(app_id),
            other => Self::Install(other.user_message()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<ClientBuildError> for CliError {
    fn from(err: ClientBuildError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error bubbled up to `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}
