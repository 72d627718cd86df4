//! Hidden redirect strategy.
//!
//! The catalog exposes `get-download.php?gid=<id>&test=true`, which answers a
//! HEAD request with a 301 pointing at the real file host. Redirects must not
//! be followed here: the `Location` header is the answer.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use reqwest::header::LOCATION;
use tracing::{debug, warn};
use url::Url;

use crate::site::{REDIRECT_ENDPOINT, Redirects, SiteConfig, SiteError, build_client};

use super::{FileAnchor, ResolveError, ResolveStep, ResolveStrategy, ResolvedUrl};

/// Queries the redirect endpoint with the anchor's game id.
#[derive(Debug, Clone)]
pub struct HiddenRedirectStrategy {
    client: Client,
    endpoint: Url,
}

impl HiddenRedirectStrategy {
    /// Creates the strategy for the host in `config`, with redirects disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the endpoint URL or the client cannot be built.
    pub fn new(config: &SiteConfig) -> Result<Self, SiteError> {
        Ok(Self {
            client: build_client(config, Redirects::Manual)?,
            endpoint: config.page_url(REDIRECT_ENDPOINT)?,
        })
    }

    /// Uses a caller-supplied client. It must not follow redirects.
    #[must_use]
    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    fn query_url(&self, game_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("gid", game_id)
            .append_pair("test", "true");
        url
    }
}

#[async_trait]
impl ResolveStrategy for HiddenRedirectStrategy {
    fn name(&self) -> &'static str {
        "redirect"
    }

    #[tracing::instrument(skip(self, anchor), fields(strategy = "redirect", game_id = ?anchor.game_id))]
    async fn resolve(&self, anchor: &FileAnchor) -> Result<ResolveStep, ResolveError> {
        let Some(game_id) = anchor.game_id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(ResolveStep::Failed(ResolveError::MissingGameId {
                href: anchor.href.clone(),
            }));
        };

        let url = self.query_url(game_id);
        let response = self
            .client
            .head(url.clone())
            .send()
            .await
            .map_err(|e| ResolveError::network(url.as_str(), &e))?;

        let status = response.status();
        if status != StatusCode::MOVED_PERMANENTLY {
            warn!(url = %url, status = status.as_u16(), "redirect endpoint did not answer 301");
            return Ok(ResolveStep::Failed(ResolveError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        let Some(location) = location else {
            return Ok(ResolveStep::Failed(ResolveError::MissingLocation {
                url: url.to_string(),
            }));
        };

        let target = url
            .join(location)
            .map_err(|_| ResolveError::invalid_url(location))?;
        debug!(target = %target, "redirect endpoint answered");
        Ok(ResolveStep::Url(ResolvedUrl::new(target, self.name())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    fn strategy_for(base: &str) -> HiddenRedirectStrategy {
        HiddenRedirectStrategy::new(&SiteConfig::new(base).unwrap()).unwrap()
    }

    fn anchor() -> FileAnchor {
        FileAnchor::new("/Sega_Dreamcast_ISOs/Game/42-download", "Download Game").with_game_id("42")
    }

    #[test]
    fn test_query_url_carries_game_id_and_test_flag() {
        let strategy = strategy_for("http://catalog.test");
        assert_eq!(
            strategy.query_url("42").as_str(),
            "http://catalog.test/roms/get-download.php?gid=42&test=true"
        );
    }

    #[tokio::test]
    async fn test_301_location_is_resolved_url() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("HEAD"))
            .and(path(REDIRECT_ENDPOINT))
            .and(query_param("gid", "42"))
            .and(query_param("test", "true"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "http://files.test/game.7z"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let step = strategy_for(&server.uri()).resolve(&anchor()).await.unwrap();

        match step {
            ResolveStep::Url(resolved) => assert_eq!(resolved.url, "http://files.test/game.7z"),
            ResolveStep::Failed(e) => panic!("expected Url, got {e}"),
        }
    }

    #[tokio::test]
    async fn test_relative_location_is_joined_onto_endpoint() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("HEAD"))
            .and(path(REDIRECT_ENDPOINT))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/files/game.7z"))
            .mount(&server)
            .await;

        let step = strategy_for(&server.uri()).resolve(&anchor()).await.unwrap();

        match step {
            ResolveStep::Url(resolved) => {
                assert_eq!(resolved.url, format!("{}/files/game.7z", server.uri()));
            }
            ResolveStep::Failed(e) => panic!("expected Url, got {e}"),
        }
    }

    #[tokio::test]
    async fn test_302_is_a_server_error() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("HEAD"))
            .and(path(REDIRECT_ENDPOINT))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "http://x.test/"))
            .mount(&server)
            .await;

        let step = strategy_for(&server.uri()).resolve(&anchor()).await.unwrap();

        assert!(matches!(
            step,
            ResolveStep::Failed(ResolveError::UnexpectedStatus { status: 302, .. })
        ));
    }

    #[tokio::test]
    async fn test_301_without_location_does_not_apply() {
        let Some(server) = start_mock_server_or_skip().await else {
            return;
        };
        Mock::given(method("HEAD"))
            .and(path(REDIRECT_ENDPOINT))
            .respond_with(ResponseTemplate::new(301))
            .mount(&server)
            .await;

        let step = strategy_for(&server.uri()).resolve(&anchor()).await.unwrap();

        assert!(matches!(
            step,
            ResolveStep::Failed(ResolveError::MissingLocation { .. })
        ));
    }

    #[tokio::test]
    async fn test_anchor_without_game_id_is_not_queried() {
        let strategy = strategy_for("http://127.0.0.1:1");
        let step = strategy
            .resolve(&FileAnchor::new("/x", "x"))
            .await
            .unwrap();
        assert!(matches!(
            step,
            ResolveStep::Failed(ResolveError::MissingGameId { .. })
        ));
    }
}
