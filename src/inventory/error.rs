//! Error types for game page inventory.

use thiserror::Error;

/// Errors raised while turning a game page into file candidates.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Legacy `/roms/` pages use a layout this tool does not parse.
    #[error("unsupported page layout at {url}: legacy /roms/ pages are not handled")]
    UnsupportedLayout {
        /// Game page URL.
        url: String,
    },

    /// The page has no `div.download-link` section.
    #[error("no download section found on {url}")]
    MissingDownloadSection {
        /// Game page URL.
        url: String,
    },

    /// The game page answered with a non-success status.
    #[error("HTTP {status} fetching game page {url}")]
    HttpStatus {
        /// Game page URL.
        url: String,
        /// Returned status code.
        status: u16,
    },

    /// Transport failure fetching the game page.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// Game page URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl InventoryError {
    /// True for errors caused by page content rather than transport.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedLayout { .. } | Self::MissingDownloadSection { .. }
        )
    }
}
