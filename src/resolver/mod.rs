//! URL resolution for download anchors on a game page.
//!
//! The catalog never publishes the real file location, so each anchor goes
//! through an ordered chain of strategies until one yields a URL:
//!
//! - [`DirectLinkStrategy`] - the href itself, if it serves bytes rather than HTML
//! - [`HiddenRedirectStrategy`] - the `get-download.php` 301 target for the game id
//! - [`MirrorFallbackStrategy`] - a mirror URL built from a `Download <NAME> ISO` title
//!
//! [`UrlResolver`] owns the chain. Resolution never fails as a whole; when no
//! strategy applies the [`ResolveOutcome`] simply carries no URL plus the
//! per-strategy errors.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use emudl_core::probe::HttpProbe;
//! use emudl_core::resolver::{FileAnchor, UrlResolver};
//! use emudl_core::site::SiteConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SiteConfig::default();
//! let probe = Arc::new(HttpProbe::new(&config)?);
//! let resolver = UrlResolver::standard(&config, probe)?;
//!
//! let anchor = FileAnchor::new("/Sega_Dreamcast_ISOs/Sonic/123-download", "Download Sonic")
//!     .with_game_id("123");
//! if let Some(url) = resolver.resolve(&anchor).await.url() {
//!     println!("{url}");
//! }
//! # Ok(())
//! # }
//! ```

mod chain;
mod direct;
mod error;
mod mirror;
mod redirect;

pub use chain::UrlResolver;
pub use direct::DirectLinkStrategy;
pub use error::ResolveError;
pub use mirror::{MIRROR_TITLE_PATTERN, MirrorFallbackStrategy};
pub use redirect::HiddenRedirectStrategy;

use async_trait::async_trait;

/// A download anchor as found inside a game page's download section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnchor {
    /// Raw `href` attribute.
    pub href: String,
    /// `title` attribute, when present.
    pub title_attr: Option<String>,
    /// Visible anchor text.
    pub text: String,
    /// Catalog id of the owning game (last segment of the game page URL).
    pub game_id: Option<String>,
}

impl FileAnchor {
    #[must_use]
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title_attr: None,
            text: text.into(),
            game_id: None,
        }
    }

    #[must_use]
    pub fn with_title_attr(mut self, title: impl Into<String>) -> Self {
        self.title_attr = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    /// Title used for name-based matching: the `title` attribute, else the text.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title_attr
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.text.trim())
    }
}

/// A URL produced by one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// Downloadable URL.
    pub url: String,
    /// Name of the strategy that produced it.
    pub strategy: &'static str,
}

impl ResolvedUrl {
    #[must_use]
    pub fn new(url: impl Into<String>, strategy: &'static str) -> Self {
        Self {
            url: url.into(),
            strategy,
        }
    }
}

/// Result of a single strategy's attempt.
#[derive(Debug, Clone)]
pub enum ResolveStep {
    /// The strategy found a URL; the chain stops here.
    Url(ResolvedUrl),
    /// The strategy does not apply to this anchor; try the next one.
    Failed(ResolveError),
}

/// One link in the resolution chain.
///
/// Uses `async_trait` so strategies can live in a `Vec<Box<dyn ResolveStrategy>>`.
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    /// Short name used in logs and [`ResolvedUrl::strategy`].
    fn name(&self) -> &'static str;

    /// Attempts to turn `anchor` into a downloadable URL.
    ///
    /// `Err` and `Ok(ResolveStep::Failed)` are treated alike by the chain.
    async fn resolve(&self, anchor: &FileAnchor) -> Result<ResolveStep, ResolveError>;
}

/// What the chain concluded for one anchor.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    resolved: Option<ResolvedUrl>,
    failures: Vec<(&'static str, ResolveError)>,
}

impl ResolveOutcome {
    pub(crate) fn new(
        resolved: Option<ResolvedUrl>,
        failures: Vec<(&'static str, ResolveError)>,
    ) -> Self {
        Self { resolved, failures }
    }

    /// Resolved URL, absent when every strategy failed.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.resolved.as_ref().map(|r| r.url.as_str())
    }

    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedUrl> {
        self.resolved.as_ref()
    }

    #[must_use]
    pub fn into_url(self) -> Option<String> {
        self.resolved.map(|r| r.url)
    }

    /// Failures recorded by strategies tried before the chain stopped.
    #[must_use]
    pub fn failures(&self) -> &[(&'static str, ResolveError)] {
        &self.failures
    }

    /// The host's unexpected redirect answer, if nothing resolved and the
    /// redirect endpoint misbehaved.
    #[must_use]
    pub fn server_error(&self) -> Option<&ResolveError> {
        if self.resolved.is_some() {
            return None;
        }
        self.failures
            .iter()
            .map(|(_, error)| error)
            .find(|error| error.is_server_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_title_prefers_title_attribute() {
        let anchor = FileAnchor::new("/x", "Download Now").with_title_attr("Download Sonic CD ISO");
        assert_eq!(anchor.title(), "Download Sonic CD ISO");
    }

    #[test]
    fn test_anchor_title_falls_back_to_text() {
        let anchor = FileAnchor::new("/x", " Download Shenmue ISO ").with_title_attr("  ");
        assert_eq!(anchor.title(), "Download Shenmue ISO");
    }

    #[test]
    fn test_outcome_server_error_only_when_unresolved() {
        let failure = ResolveError::UnexpectedStatus {
            url: "u".to_string(),
            status: 404,
        };
        let unresolved = ResolveOutcome::new(None, vec![("redirect", failure.clone())]);
        assert!(unresolved.server_error().is_some());
        assert!(unresolved.url().is_none());

        let resolved = ResolveOutcome::new(
            Some(ResolvedUrl::new("http://m/x", "mirror")),
            vec![("redirect", failure)],
        );
        assert!(resolved.server_error().is_none());
        assert_eq!(resolved.url(), Some("http://m/x"));
    }
}
