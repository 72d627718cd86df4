//! Error types for URL resolution.
//!
//! A strategy failure is never fatal on its own: the chain records it and
//! moves on. The recorded errors explain why a file ended up without a URL.

use thiserror::Error;

use crate::probe::ProbeError;

/// Why a single resolution strategy did not produce a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The candidate URL could not be probed.
    #[error("probe failed for {url}: {reason}")]
    ProbeFailed {
        /// Probed URL.
        url: String,
        /// Probe error message.
        reason: String,
    },

    /// The candidate URL serves an HTML page, not file bytes.
    #[error("{url} serves HTML ({content_type}), not a file")]
    HtmlContent {
        /// Probed URL.
        url: String,
        /// Reported content type.
        content_type: String,
    },

    /// The redirect endpoint answered with something other than 301.
    #[error("server error: redirect endpoint {url} answered HTTP {status}, expected 301")]
    UnexpectedStatus {
        /// Endpoint URL.
        url: String,
        /// Returned status code.
        status: u16,
    },

    /// The redirect endpoint answered 301 without a usable `Location`.
    #[error("redirect endpoint {url} answered 301 without a Location header")]
    MissingLocation {
        /// Endpoint URL.
        url: String,
    },

    /// The anchor title does not follow the mirror naming convention.
    #[error("title '{title}' does not match the mirror naming pattern")]
    TitleMismatch {
        /// Title that was tested.
        title: String,
    },

    /// The anchor carries no game id to query the redirect endpoint with.
    #[error("anchor '{href}' has no game id")]
    MissingGameId {
        /// Anchor href.
        href: String,
    },

    /// Transport failure talking to the redirect endpoint.
    #[error("network error resolving {url}: {reason}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error message.
        reason: String,
    },

    /// The href or a derived URL could not be parsed.
    #[error("invalid URL '{url}'")]
    InvalidUrl {
        /// Rejected value.
        url: String,
    },
}

impl ResolveError {
    /// Wraps a probe failure for `url`.
    #[must_use]
    pub fn probe_failed(url: &str, error: &ProbeError) -> Self {
        Self::ProbeFailed {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }

    /// Creates a `Network` error from a reqwest failure.
    #[must_use]
    pub fn network(url: &str, error: &reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }

    /// Creates an `InvalidUrl` error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// True for errors that mean the catalog host itself misbehaved.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. })
    }
}
