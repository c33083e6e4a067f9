use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::CatalogPortError;

/// Failures surfaced by a catalog traversal.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog root could not be listed; nothing was discovered.
    #[error("Catalog unavailable: {message}")]
    CatalogUnavailable { message: String },

    /// One app could not be fetched and was left out.
    #[error("Skipped app '{app_id}': {message}")]
    AppFetchSkipped { app_id: String, message: String },
}

impl CatalogError {
    pub fn unavailable(err: &CatalogPortError) -> Self {
        Self::CatalogUnavailable {
            message: err.to_string(),
        }
    }

    pub fn skipped(app_id: impl Into<String>, err: &CatalogPortError) -> Self {
        Self::AppFetchSkipped {
            app_id: app_id.into(),
            message: err.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::CatalogUnavailable { message } => {
                format!("Could not load the app catalog: {message}")
            }
            Self::AppFetchSkipped { app_id, message } => {
                format!("'{app_id}' could not be loaded and was skipped: {message}")
            }
        }
    }
}
