//! Catalog listing pages and the entries found on them.
//!
//! A platform listing is a page of `a.index.gamelist` anchors, one per game.
//! Each becomes a [`CatalogEntry`] whose URL has the shape
//! `/<platform>/<game folder>/<game id>`; those segments name the download
//! directory and feed the hidden-redirect lookup.

mod error;
mod platforms;

pub use error::CatalogError;
pub use platforms::{PLATFORMS, Platform};

use std::sync::LazyLock;

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use crate::site::SiteConfig;

#[allow(clippy::expect_used)]
static GAMELIST_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.index.gamelist").expect("valid gamelist selector"));

/// A game listed on a platform page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Display title.
    pub title: String,
    /// Absolute URL of the game page.
    pub page_url: String,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(title: impl Into<String>, page_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            page_url: page_url.into(),
        }
    }

    fn segments(&self) -> Result<Vec<String>, CatalogError> {
        let url = Url::parse(&self.page_url)
            .map_err(|_| CatalogError::malformed(&self.page_url, "not an absolute URL"))?;
        let segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(segments)
    }

    fn segment(&self, index: usize, reason: &'static str) -> Result<String, CatalogError> {
        self.segments()?
            .into_iter()
            .nth(index)
            .ok_or_else(|| CatalogError::malformed(&self.page_url, reason))
    }

    /// First path segment, e.g. `Sega_Dreamcast_ISOs`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedEntryUrl`] if the URL has no path.
    pub fn platform_segment(&self) -> Result<String, CatalogError> {
        self.segment(0, "missing platform segment")
    }

    /// Second path segment, e.g. `Sonic_Adventure_(USA)`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedEntryUrl`] if the segment is absent.
    pub fn game_folder_segment(&self) -> Result<String, CatalogError> {
        self.segment(1, "missing game folder segment")
    }

    /// Last path segment: the catalog id queried by the hidden redirect.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MalformedEntryUrl`] if the URL has no path.
    pub fn game_id(&self) -> Result<String, CatalogError> {
        self.segments()?
            .pop()
            .ok_or_else(|| CatalogError::malformed(&self.page_url, "missing game id"))
    }

    /// True for the legacy `/roms/` page layout.
    #[must_use]
    pub fn is_legacy_layout(&self) -> bool {
        self.page_url.contains("/roms/")
    }
}

/// Fetches a platform listing and returns its games in page order.
///
/// # Errors
///
/// Returns [`CatalogError::HttpStatus`] unless the page answers 200, and
/// [`CatalogError::Network`] on transport failure.
#[instrument(skip(client, config), fields(base = %config.base_url()))]
pub async fn search_catalog(
    client: &Client,
    config: &SiteConfig,
    platform_path: &str,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    let url = config.page_url(platform_path)?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| CatalogError::Network {
            url: url.to_string(),
            source,
        })?;

    if response.status() != reqwest::StatusCode::OK {
        return Err(CatalogError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| CatalogError::Network {
            url: url.to_string(),
            source,
        })?;

    let entries = parse_listing(&body, config);
    debug!(count = entries.len(), "catalog listing parsed");
    Ok(entries)
}

/// Extracts catalog entries from listing HTML.
#[must_use]
pub fn parse_listing(html: &str, config: &SiteConfig) -> Vec<CatalogEntry> {
    let document = Html::parse_document(html);
    document
        .select(&GAMELIST_ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let page_url = config.absolutize(href)?;
            let title = anchor.text().collect::<String>().trim().to_string();
            Some(CatalogEntry::new(title, page_url))
        })
        .collect()
}
