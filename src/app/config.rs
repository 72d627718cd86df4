//! Optional TOML configuration and its merge with CLI flags.
//!
//! Looked up at `$XDG_CONFIG_HOME/emudl/config.toml`, falling back to
//! `$HOME/.config/emudl/config.toml`. A missing file is not an error.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use emudl_core::download::DEFAULT_OUTPUT_DIR;
use emudl_core::site::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, SiteConfig};
use serde::Deserialize;

use crate::cli::Args;

/// Values accepted in `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Destination root for downloads.
    pub output_dir: Option<PathBuf>,
    /// Catalog host.
    pub base_url: Option<String>,
    /// Mirror directory for the ISO title fallback.
    pub mirror_base: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates ranges that the TOML types cannot express.
    pub fn validate(&self) -> Result<()> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Effective settings after merging defaults, file config and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub site: SiteConfig,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/emudl/config.toml`
/// 2. `$HOME/.config/emudl/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join("emudl").join("config.toml"));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("emudl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    env::var_os(name).filter(|value| !value.is_empty())
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<Option<FileConfig>> {
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path).map(Some),
        _ => Ok(None),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

/// Merges CLI flags over file values over built-in defaults.
pub fn resolve_settings(args: &Args, file: Option<&FileConfig>) -> Result<Settings> {
    let file = file.cloned().unwrap_or_default();

    let output_dir = args
        .output
        .clone()
        .or(file.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let mut site = match args.base_url.as_deref().or(file.base_url.as_deref()) {
        Some(base_url) => SiteConfig::new(base_url)?,
        None => SiteConfig::default(),
    };
    if let Some(mirror_base) = args.mirror_base.as_deref().or(file.mirror_base.as_deref()) {
        site = site.with_mirror_base(mirror_base)?;
    }
    let connect = file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS);
    let read = file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS);
    site = site.with_timeouts(Duration::from_secs(connect), Duration::from_secs(read));

    Ok(Settings { output_dir, site })
}
