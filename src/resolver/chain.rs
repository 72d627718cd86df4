//! Ordered strategy chain.

use std::sync::Arc;

use tracing::{debug, info};

use crate::probe::Probe;
use crate::site::{SiteConfig, SiteError};

use super::{
    DirectLinkStrategy, FileAnchor, HiddenRedirectStrategy, MirrorFallbackStrategy,
    ResolveOutcome, ResolveStep, ResolveStrategy,
};

/// Runs [`ResolveStrategy`]s in registration order and stops at the first URL.
#[derive(Default)]
pub struct UrlResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl UrlResolver {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates a chain from an explicit strategy list.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { strategies }
    }

    /// Builds the production chain: direct link, hidden redirect, mirror fallback.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the redirect endpoint URL or its client cannot
    /// be built from `config`.
    pub fn standard(config: &SiteConfig, probe: Arc<dyn Probe>) -> Result<Self, SiteError> {
        let mut resolver = Self::new();
        resolver.register(Box::new(DirectLinkStrategy::new(config.clone(), probe)));
        resolver.register(Box::new(HiddenRedirectStrategy::new(config)?));
        resolver.register(Box::new(MirrorFallbackStrategy::new(config.mirror_base())));
        Ok(resolver)
    }

    /// Appends a strategy to the end of the chain.
    pub fn register(&mut self, strategy: Box<dyn ResolveStrategy>) {
        debug!(name = strategy.name(), "registering resolve strategy");
        self.strategies.push(strategy);
    }

    #[must_use]
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Names of registered strategies in chain order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolves `anchor`, trying each strategy once in order.
    #[tracing::instrument(skip(self, anchor), fields(href = %anchor.href))]
    pub async fn resolve(&self, anchor: &FileAnchor) -> ResolveOutcome {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            debug!(strategy = strategy.name(), "trying strategy");
            match strategy.resolve(anchor).await {
                Ok(ResolveStep::Url(resolved)) => {
                    info!(strategy = strategy.name(), url = %resolved.url, "resolved");
                    return ResolveOutcome::new(Some(resolved), failures);
                }
                Ok(ResolveStep::Failed(error)) | Err(error) => {
                    debug!(strategy = strategy.name(), error = %error, "strategy did not apply");
                    failures.push((strategy.name(), error));
                }
            }
        }

        debug!(tried = failures.len(), "no strategy resolved anchor");
        ResolveOutcome::new(None, failures)
    }
}

impl std::fmt::Debug for UrlResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlResolver")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
