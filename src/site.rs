//! Catalog host settings and the HTTP client policy shared by every component.
//!
//! The catalog host filters obvious bots, so all requests carry the same
//! browser-like header set. The download-mode cookie is not part of the
//! default headers; only the byte-fetch request in [`crate::download`] adds it.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use url::Url;

/// Production catalog host.
pub const DEFAULT_BASE_URL: &str = "https://www.emuparadise.me";

/// Mirror directory serving Dreamcast images by display name.
pub const DEFAULT_MIRROR_BASE: &str = "http://50.7.189.186/happyxhJ1ACmlTrxJQpol71nBc/Dreamcast/";

/// Endpoint answering with a 301 to the real download host.
pub const REDIRECT_ENDPOINT: &str = "/roms/get-download.php";

/// Browser User-Agent the host expects.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:59.0) Gecko/20100101 Firefox/59.0";

/// Accept header sent with every request.
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Referer value the host checks for.
pub const SITE_REFERER: &str = "emuparadise";

/// Cookie switching the host into plain HTTP download mode.
pub const DOWNLOAD_COOKIE: &str = "epdprefs=ephttpdownload";

/// Default connect timeout for all clients.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default read timeout. Page and probe clients use it as a whole-request
/// timeout; the download client applies it per read so large images finish.
pub const READ_TIMEOUT_SECS: u64 = 300;

#[allow(clippy::expect_used)]
static DEFAULT_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(DEFAULT_BASE_URL).expect("valid built-in base URL"));

/// Errors raised while building site settings or HTTP clients.
#[derive(Debug, Error)]
pub enum SiteError {
    /// A configured base or mirror URL could not be parsed.
    #[error("invalid site URL '{url}': expected an absolute http(s) URL")]
    InvalidUrl {
        /// The rejected value.
        url: String,
    },

    /// reqwest refused the client configuration.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// Underlying builder error.
        #[source]
        source: reqwest::Error,
    },
}

/// Whether a client follows HTTP redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirects {
    /// Follow redirects (reqwest default limit).
    Follow,
    /// Return 3xx responses to the caller untouched.
    Manual,
}

/// Where the catalog lives and how patient we are with it.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    base_url: Url,
    mirror_base: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl SiteConfig {
    /// Creates settings for the given catalog host.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidUrl`] unless `base_url` is an absolute
    /// http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, SiteError> {
        Ok(Self {
            base_url: parse_http_url(base_url)?,
            mirror_base: DEFAULT_MIRROR_BASE.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        })
    }

    /// Replaces the mirror base used by the Dreamcast fallback.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidUrl`] unless `mirror_base` is an absolute
    /// http(s) URL.
    pub fn with_mirror_base(mut self, mirror_base: &str) -> Result<Self, SiteError> {
        parse_http_url(mirror_base)?;
        self.mirror_base = if mirror_base.ends_with('/') {
            mirror_base.to_string()
        } else {
            format!("{mirror_base}/")
        };
        Ok(self)
    }

    /// Replaces connect and read timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout: Duration, read_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self
    }

    /// Catalog host root.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Mirror base, always ending in `/`.
    #[must_use]
    pub fn mirror_base(&self) -> &str {
        &self.mirror_base
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Joins a site-relative path (e.g. a platform listing path) onto the host.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidUrl`] if the join produces an invalid URL.
    pub fn page_url(&self, path: &str) -> Result<Url, SiteError> {
        self.base_url.join(path).map_err(|_| SiteError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
        })
    }

    /// Turns an `href` found on a catalog page into an absolute URL string.
    ///
    /// Absolute http(s) links are kept verbatim, protocol-relative links get
    /// an `http:` scheme, everything else is joined onto the host.
    #[must_use]
    pub fn absolutize(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            return Some(href.to_string());
        }
        if href.starts_with("//") {
            return Some(format!("http:{href}"));
        }
        self.base_url.join(href).ok().map(String::from)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE.clone(),
            mirror_base: DEFAULT_MIRROR_BASE.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

fn parse_http_url(value: &str) -> Result<Url, SiteError> {
    Url::parse(value)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .ok_or_else(|| SiteError::InvalidUrl {
            url: value.to_string(),
        })
}

/// Header set every request carries.
#[must_use]
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(REFERER, HeaderValue::from_static(SITE_REFERER));
    headers
}

/// Builds a client for page fetches and header probes.
///
/// # Errors
///
/// Returns [`SiteError::ClientBuild`] when reqwest rejects the configuration.
pub fn build_client(config: &SiteConfig, redirects: Redirects) -> Result<Client, SiteError> {
    base_builder(config, redirects)
        .timeout(config.read_timeout)
        .build()
        .map_err(|source| SiteError::ClientBuild { source })
}

/// Builds the byte-streaming client. The read timeout applies per read so
/// multi-gigabyte images are not cut off by a whole-request deadline.
///
/// # Errors
///
/// Returns [`SiteError::ClientBuild`] when reqwest rejects the configuration.
pub fn build_download_client(config: &SiteConfig) -> Result<Client, SiteError> {
    base_builder(config, Redirects::Follow)
        .read_timeout(config.read_timeout)
        .build()
        .map_err(|source| SiteError::ClientBuild { source })
}

fn base_builder(config: &SiteConfig, redirects: Redirects) -> ClientBuilder {
    let policy = match redirects {
        Redirects::Follow => Policy::default(),
        Redirects::Manual => Policy::none(),
    };
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .default_headers(browser_headers())
        .redirect(policy)
        .gzip(true)
}
