#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// GithubCatalogClient<B> stays crate-private; callers go through
// DefaultCatalogClient and the CatalogSourcePort trait.
#![allow(private_interfaces)]

mod client;
mod config;
mod error;
mod http;
mod models;
mod parsing;
mod port;
mod url;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultCatalogClient;

// Configuration
pub use config::CatalogClientConfig;

// Construction errors
pub use error::ClientBuildError;

