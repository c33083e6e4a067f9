//! Remote catalog traversal.

mod errors;
mod fetcher;

pub use errors::CatalogError;
pub use fetcher::{
    FetcherConfig, IMAGES_DIR, INFO_DIR, PACKAGE_DIR, RemoteTreeFetcher, TraversalEvent,
    TraversalSummary,
};
