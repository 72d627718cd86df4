//! Dreamcast mirror fallback.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{FileAnchor, ResolveError, ResolveStep, ResolveStrategy, ResolvedUrl};

/// Title shape the mirror keys its files by.
pub const MIRROR_TITLE_PATTERN: &str = r"^Download (.*) ISO";

#[allow(clippy::expect_used)]
static MIRROR_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MIRROR_TITLE_PATTERN).expect("valid mirror title pattern"));

/// Builds `<mirror_base><NAME>` from a `Download <NAME> ISO` anchor title.
///
/// No request is made; the URL is a guess the download step will confirm.
#[derive(Debug, Clone)]
pub struct MirrorFallbackStrategy {
    mirror_base: String,
}

impl MirrorFallbackStrategy {
    #[must_use]
    pub fn new(mirror_base: impl Into<String>) -> Self {
        let mut mirror_base = mirror_base.into();
        if !mirror_base.ends_with('/') {
            mirror_base.push('/');
        }
        Self { mirror_base }
    }

    /// Extracts the display name from a mirror-style title.
    #[must_use]
    pub fn display_name(title: &str) -> Option<&str> {
        MIRROR_TITLE
            .captures(title)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|name| !name.is_empty())
    }
}

#[async_trait]
impl ResolveStrategy for MirrorFallbackStrategy {
    fn name(&self) -> &'static str {
        "mirror"
    }

    async fn resolve(&self, anchor: &FileAnchor) -> Result<ResolveStep, ResolveError> {
        let title = anchor.title();
        Ok(match Self::display_name(title) {
            Some(name) => ResolveStep::Url(ResolvedUrl::new(
                format!("{}{name}", self.mirror_base),
                self.name(),
            )),
            None => ResolveStep::Failed(ResolveError::TitleMismatch {
                title: title.to_string(),
            }),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_extracts_iso_title() {
        assert_eq!(
            MirrorFallbackStrategy::display_name("Download Sonic CD ISO"),
            Some("Sonic CD")
        );
        assert_eq!(
            MirrorFallbackStrategy::display_name("Download Shenmue (Disc 1) ISO"),
            Some("Shenmue (Disc 1)")
        );
    }

    #[test]
    fn test_display_name_rejects_other_titles() {
        assert_eq!(MirrorFallbackStrategy::display_name("Sonic CD ISO"), None);
        assert_eq!(MirrorFallbackStrategy::display_name("Download Sonic CD"), None);
        assert_eq!(MirrorFallbackStrategy::display_name("Download  ISO"), None);
    }

    #[tokio::test]
    async fn test_matching_title_builds_mirror_url() {
        let strategy = MirrorFallbackStrategy::new("http://mirror.test/Dreamcast");
        let anchor = FileAnchor::new("/x", "Download").with_title_attr("Download Sonic CD ISO");

        let step = strategy.resolve(&anchor).await.unwrap();

        match step {
            ResolveStep::Url(resolved) => {
                assert_eq!(resolved.url, "http://mirror.test/Dreamcast/Sonic CD");
            }
            ResolveStep::Failed(e) => panic!("expected Url, got {e}"),
        }
    }

    #[tokio::test]
    async fn test_non_matching_title_does_not_apply() {
        let strategy = MirrorFallbackStrategy::new("http://mirror.test/");
        let anchor = FileAnchor::new("/x", "Download Manual (PDF)");

        let step = strategy.resolve(&anchor).await.unwrap();

        assert!(matches!(
            step,
            ResolveStep::Failed(ResolveError::TitleMismatch { .. })
        ));
    }
}
