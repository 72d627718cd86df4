//! Error types for the download module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching selected files.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// A selected index does not exist in the inventory.
    #[error("selected file number {index} does not exist (game has {len} file(s))")]
    Selection {
        /// Requested index.
        index: usize,
        /// Inventory length.
        len: usize,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error (create directory, create file, write).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL, or the catalog entry URL, is malformed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The final response URL has no usable last path segment.
    #[error("cannot derive a file name from {url}")]
    MissingFileName {
        /// Final response URL.
        url: String,
    },

    /// A download task stopped without reporting a result.
    #[error("download task failed: {reason}")]
    TaskFailed {
        /// Panic or cancellation message.
        reason: String,
    },
}

impl DownloadError {
    /// Creates a network or timeout error from a reqwest error.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a selection error for an out-of-range index.
    #[must_use]
    pub fn selection(index: usize, len: usize) -> Self {
        Self::Selection { index, len }
    }

    /// True for mistakes in the caller's selection rather than I/O failures.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Selection { .. })
    }
}

// No `From<reqwest::Error>` or `From<std::io::Error>`: every variant needs the
// URL or path, which the source errors do not carry.
