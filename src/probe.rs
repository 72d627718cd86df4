//! Header-only probing of candidate URLs.
//!
//! A probe issues a HEAD request (following redirects) and reports the
//! content type and declared size without touching the body. Resolution
//! strategies use it to tell a byte stream from an HTML page; the inventory
//! uses it for size labels.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::site::{Redirects, SiteConfig, SiteError, build_client};

/// What a HEAD request revealed about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// `Content-Type` header, empty when absent.
    pub content_type: String,
    /// `Content-Length` header, 0 when absent or unparseable.
    pub byte_size: u64,
}

impl ProbeResult {
    /// True when the endpoint serves an HTML page rather than file bytes.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("html")
    }
}

/// Transport or status failures while probing.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection refused, DNS failure, TLS failure and the like.
    #[error("network error probing {url}: {source}")]
    Network {
        /// Probed URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The HEAD request did not complete in time.
    #[error("timeout probing {url}")]
    Timeout {
        /// Probed URL.
        url: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status} probing {url}")]
    HttpStatus {
        /// Probed URL.
        url: String,
        /// Returned status code.
        status: u16,
    },
}

impl ProbeError {
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Anything able to classify a URL by its headers.
///
/// Implemented by [`HttpProbe`]; tests substitute counting fakes.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Returns the content type and size advertised for `url`.
    async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError>;
}

/// reqwest-backed [`Probe`].
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    /// Creates a probe sending the browser header set and following redirects.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::ClientBuild`] if the client cannot be built.
    pub fn new(config: &SiteConfig) -> Result<Self, SiteError> {
        Ok(Self {
            client: build_client(config, Redirects::Follow)?,
        })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    #[instrument(level = "debug", skip(self))]
    async fn probe(&self, url: &str) -> Result<ProbeResult, ProbeError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // HEAD bodies are empty, so `Response::content_length` cannot be trusted here.
        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let byte_size = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);

        debug!(%content_type, byte_size, final_url = %response.url(), "probe complete");
        Ok(ProbeResult {
            content_type,
            byte_size,
        })
    }
}
