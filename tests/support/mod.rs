#![allow(dead_code)]

pub mod socket_guard;

use emudl_core::catalog::CatalogEntry;
use emudl_core::site::SiteConfig;

/// Site settings pointing both the catalog host and the mirror at `base`.
pub fn site_for(base: &str) -> SiteConfig {
    SiteConfig::new(base)
        .and_then(|config| config.with_mirror_base(&format!("{base}/mirror/")))
        .unwrap_or_else(|e| panic!("test site config: {e}"))
}

/// Catalog entry for `/<platform>/<game>/<id>` on `base`.
pub fn entry(base: &str, platform: &str, game: &str, id: &str) -> CatalogEntry {
    CatalogEntry::new(game.replace('_', " "), format!("{base}/{platform}/{game}/{id}"))
}
