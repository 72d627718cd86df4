//! emudl core library
//!
//! Locates and fetches game images from an EmuParadise-style catalog, where
//! the real file URL is never published and has to be inferred.
//!
//! # Architecture
//!
//! Leaf-first:
//! - [`site`] - Host settings and the browser-like HTTP client policy
//! - [`probe`] - HEAD probes reporting content type and size
//! - [`resolver`] - Ordered strategy chain turning page anchors into file URLs
//! - [`inventory`] - Game page parsing into sized, resolved file candidates
//! - [`download`] - Bounded concurrent streaming downloads
//! - [`catalog`] - Platform list and listing-page search
//! - [`selection`] - Parsing user index selections

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod download;
pub mod inventory;
pub mod probe;
pub mod resolver;
pub mod selection;
pub mod site;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use catalog::{CatalogEntry, CatalogError, PLATFORMS, Platform, search_catalog};
pub use download::{
    CompletionStream, DownloadEngine, DownloadError, HttpClient, JobFailure, JobOutcome,
    JobStatus, MAX_CONCURRENT_DOWNLOADS,
};
pub use inventory::{FileCandidate, FileInventory, InventoryError, format_size};
pub use probe::{HttpProbe, Probe, ProbeError, ProbeResult};
pub use resolver::{FileAnchor, ResolveError, ResolveOutcome, UrlResolver};
pub use selection::{Selection, SelectionError, parse_indices};
pub use site::{SiteConfig, SiteError};
