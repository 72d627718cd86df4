//! Direct link strategy: use the href if it serves file bytes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::probe::Probe;
use crate::site::SiteConfig;

use super::{FileAnchor, ResolveError, ResolveStep, ResolveStrategy, ResolvedUrl};

/// Accepts the anchor's own href unless a HEAD probe reports HTML.
///
/// Relative hrefs are joined onto the catalog host first. Exactly one probe
/// is issued per anchor.
pub struct DirectLinkStrategy {
    config: SiteConfig,
    probe: Arc<dyn Probe>,
}

impl DirectLinkStrategy {
    #[must_use]
    pub fn new(config: SiteConfig, probe: Arc<dyn Probe>) -> Self {
        Self { config, probe }
    }
}

#[async_trait]
impl ResolveStrategy for DirectLinkStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    #[tracing::instrument(skip(self, anchor), fields(strategy = "direct", href = %anchor.href))]
    async fn resolve(&self, anchor: &FileAnchor) -> Result<ResolveStep, ResolveError> {
        let Some(url) = self.config.absolutize(&anchor.href) else {
            return Ok(ResolveStep::Failed(ResolveError::invalid_url(&anchor.href)));
        };

        let probed = match self.probe.probe(&url).await {
            Ok(probed) => probed,
            Err(error) => {
                debug!(%url, error = %error, "direct link probe failed");
                return Ok(ResolveStep::Failed(ResolveError::probe_failed(&url, &error)));
            }
        };

        if probed.is_html() {
            return Ok(ResolveStep::Failed(ResolveError::HtmlContent {
                url,
                content_type: probed.content_type,
            }));
        }

        Ok(ResolveStep::Url(ResolvedUrl::new(url, self.name())))
    }
}
