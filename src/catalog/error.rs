//! Error types for catalog search.

use thiserror::Error;

/// Errors raised while listing a platform or interpreting catalog URLs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The listing page could not be fetched.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// Listing URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The listing page answered with something other than 200.
    #[error("search query failed: HTTP {status} from {url}")]
    HttpStatus {
        /// Listing URL.
        url: String,
        /// Returned status code.
        status: u16,
    },

    /// A catalog entry URL lacks the `/<platform>/<game>/<id>` shape.
    #[error("malformed catalog entry URL '{url}': {reason}")]
    MalformedEntryUrl {
        /// Offending URL.
        url: String,
        /// Which part was missing.
        reason: &'static str,
    },

    /// Site settings produced an unusable URL.
    #[error(transparent)]
    Site(#[from] crate::site::SiteError),
}

impl CatalogError {
    /// Creates a `MalformedEntryUrl` error.
    pub fn malformed(url: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedEntryUrl {
            url: url.into(),
            reason,
        }
    }
}
