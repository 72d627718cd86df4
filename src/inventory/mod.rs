//! Game page inventory: which files a game offers and where they live.
//!
//! [`FileInventory::list_files`] fetches a game page, walks the anchors in its
//! download section, resolves each through the [`UrlResolver`] chain and labels
//! it with a size from a HEAD probe. The result is fully materialized before
//! any download starts.

mod error;
mod size;

pub use error::InventoryError;
pub use size::format_size;

use std::sync::{Arc, LazyLock};

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

use crate::catalog::CatalogEntry;
use crate::probe::{HttpProbe, Probe};
use crate::resolver::{FileAnchor, ResolveError, UrlResolver};
use crate::site::{Redirects, SiteConfig, SiteError, build_client};

#[allow(clippy::expect_used)]
static DOWNLOAD_SECTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.download-link").expect("valid section selector"));

#[allow(clippy::expect_used)]
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid anchor selector"));

/// One downloadable file of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Anchor text without the `Download ` prefix.
    pub title: String,
    /// Resolved URL; `None` when no strategy applied.
    pub url: Option<String>,
    /// Size for display, e.g. `700.0MiB`.
    pub size_label: String,
    /// Raw `Content-Length`, 0 when unknown.
    pub size_bytes: u64,
    /// Why `url` is `None`: the host's unexpected redirect answer when there
    /// was one, else the last strategy failure or an HTML rejection.
    pub resolve_error: Option<ResolveError>,
}

impl FileCandidate {
    #[must_use]
    pub fn new(title: impl Into<String>, url: Option<String>, size_bytes: u64) -> Self {
        Self {
            title: title.into(),
            url,
            size_label: format_size(size_bytes),
            size_bytes,
            resolve_error: None,
        }
    }

    /// Marks the candidate as unresolved for `error`.
    #[must_use]
    pub fn unresolved(title: impl Into<String>, error: ResolveError) -> Self {
        Self {
            resolve_error: Some(error),
            ..Self::new(title, None, 0)
        }
    }
}

/// Builds [`FileCandidate`] lists for game pages.
pub struct FileInventory {
    config: SiteConfig,
    client: Client,
    resolver: UrlResolver,
    probe: Arc<dyn Probe>,
}

impl FileInventory {
    /// Creates an inventory with the standard resolver chain.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if an HTTP client or endpoint URL cannot be built.
    pub fn new(config: &SiteConfig) -> Result<Self, SiteError> {
        let probe: Arc<dyn Probe> = Arc::new(HttpProbe::new(config)?);
        let resolver = UrlResolver::standard(config, Arc::clone(&probe))?;
        let client = build_client(config, Redirects::Follow)?;
        Ok(Self::with_parts(config.clone(), client, resolver, probe))
    }

    /// Assembles an inventory from explicit parts.
    #[must_use]
    pub fn with_parts(
        config: SiteConfig,
        client: Client,
        resolver: UrlResolver,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            config,
            client,
            resolver,
            probe,
        }
    }

    /// Lists the files offered on `entry`'s game page, in page order.
    ///
    /// Anchors that cannot be resolved are kept with `url == None`.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::UnsupportedLayout`] for legacy `/roms/` pages
    /// - [`InventoryError::HttpStatus`] / [`InventoryError::Network`] if the page fetch fails
    /// - [`InventoryError::MissingDownloadSection`] if the page has no download section
    #[instrument(skip(self, entry), fields(page = %entry.page_url))]
    pub async fn list_files(
        &self,
        entry: &CatalogEntry,
    ) -> Result<Vec<FileCandidate>, InventoryError> {
        if entry.is_legacy_layout() {
            return Err(InventoryError::UnsupportedLayout {
                url: entry.page_url.clone(),
            });
        }

        let body = self.fetch_page(&entry.page_url).await?;
        let game_id = entry.game_id().ok();
        let anchors = extract_download_anchors(&body).ok_or_else(|| {
            InventoryError::MissingDownloadSection {
                url: entry.page_url.clone(),
            }
        })?;
        debug!(count = anchors.len(), "download anchors found");

        let mut candidates = Vec::with_capacity(anchors.len());
        for mut anchor in anchors {
            anchor.game_id.clone_from(&game_id);
            candidates.push(self.candidate_for(&anchor).await);
        }
        Ok(candidates)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, InventoryError> {
        let network = |source| InventoryError::Network {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(network)
    }

    /// Resolves and sizes one anchor. A URL whose HEAD answer is an HTML
    /// page is dropped, whichever way it was found.
    async fn candidate_for(&self, anchor: &FileAnchor) -> FileCandidate {
        let title = anchor.text.replace("Download ", "").trim().to_string();

        let url = if anchor.href.contains("//") {
            match self.config.absolutize(&anchor.href) {
                Some(url) => url,
                None => {
                    return FileCandidate::unresolved(
                        title,
                        ResolveError::invalid_url(anchor.href.clone()),
                    );
                }
            }
        } else {
            let outcome = self.resolver.resolve(anchor).await;
            if let Some(error) = outcome.server_error() {
                warn!(file = %title, error = %error, "no download URL; catalog host misbehaved");
            }
            let reason = outcome
                .server_error()
                .or_else(|| outcome.failures().last().map(|(_, error)| error))
                .cloned();
            match (outcome.into_url(), reason) {
                (Some(url), _) => url,
                (None, Some(reason)) => return FileCandidate::unresolved(title, reason),
                (None, None) => return FileCandidate::new(title, None, 0),
            }
        };

        let size_bytes = match self.probe.probe(&url).await {
            Ok(probed) if probed.is_html() => {
                warn!(
                    file = %title,
                    url = %url,
                    content_type = %probed.content_type,
                    "resolved URL serves HTML, dropping it"
                );
                return FileCandidate::unresolved(
                    title,
                    ResolveError::HtmlContent {
                        url,
                        content_type: probed.content_type,
                    },
                );
            }
            Ok(probed) => probed.byte_size,
            Err(error) => {
                warn!(file = %title, error = %error, "size probe failed");
                0
            }
        };

        FileCandidate::new(title, Some(url), size_bytes)
    }
}

/// Pulls the anchors out of the first `div.download-link` section.
///
/// Returns `None` when the page has no such section. Anchors without an
/// `href` are ignored. Game ids are left unset.
#[must_use]
pub fn extract_download_anchors(html: &str) -> Option<Vec<FileAnchor>> {
    let document = Html::parse_document(html);
    let section = document.select(&DOWNLOAD_SECTION).next()?;
    let anchors = section
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let mut anchor = FileAnchor::new(href, a.text().collect::<String>());
            if let Some(title) = a.value().attr("title") {
                anchor = anchor.with_title_attr(title);
            }
            Some(anchor)
        })
        .collect();
    Some(anchors)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_new_labels_size() {
        let candidate = FileCandidate::new("Game", None, 0);
        assert_eq!(candidate.size_label, "0.0B");
        assert!(candidate.url.is_none());
        assert!(candidate.resolve_error.is_none());
    }

    #[test]
    fn test_unresolved_candidate_keeps_reason() {
        let reason = ResolveError::UnexpectedStatus {
            url: "http://host/roms/get-download.php".to_string(),
            status: 503,
        };
        let candidate = FileCandidate::unresolved("Disc 2", reason.clone());
        assert!(candidate.url.is_none());
        assert_eq!(candidate.size_label, "0.0B");
        assert_eq!(candidate.resolve_error, Some(reason));
    }

    #[test]
    fn test_extract_anchors_from_download_section() {
        let html = r#"
            <div class="other"><a href="/nope">Download Nope</a></div>
            <div class="download-link">
              <a href="/Sega_Dreamcast_ISOs/Sonic/1-download" title="Download Sonic CD ISO">Download Sonic CD</a>
              <a>no href</a>
              <a href="//files.test/manual.pdf">Download Manual</a>
            </div>
        "#;

        let anchors = extract_download_anchors(html).unwrap();

        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].href, "/Sega_Dreamcast_ISOs/Sonic/1-download");
        assert_eq!(anchors[0].title(), "Download Sonic CD ISO");
        assert_eq!(anchors[0].text, "Download Sonic CD");
        assert_eq!(anchors[1].href, "//files.test/manual.pdf");
        assert!(anchors[1].title_attr.is_none());
    }

    #[test]
    fn test_extract_uses_first_section_only() {
        let html = r#"
            <div class="download-link"><a href="/a">A</a></div>
            <div class="download-link"><a href="/b">B</a></div>
        "#;
        let anchors = extract_download_anchors(html).unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].href, "/a");
    }

    #[test]
    fn test_extract_without_section_is_none() {
        assert!(extract_download_anchors("<html><body></body></html>").is_none());
    }
}
