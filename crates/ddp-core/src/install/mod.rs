//! Install/uninstall error taxonomy and per-app operation locks.

mod errors;
mod locks;

pub use errors::{InstallError, InstallResult};
pub use locks::KeyedLocks;
