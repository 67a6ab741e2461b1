//! CLI configuration.
//!
//! Read from `--config PATH` when given, otherwise from
//! `$XDG_CONFIG_HOME/bsonv/config.toml` if that file exists.
//!
//! ```toml
//! parse_to_bson = true
//! mode = "async"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Which entry point a check runs through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Sync,
    Async,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parse_to_bson: bool,
    pub mode: Mode,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. The default location is optional; a
    /// missing file there yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = config_path();
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "no config file; using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}

/// Default config file location.
///
/// Uses `$XDG_CONFIG_HOME/bsonv/config.toml` or falls back to
/// `~/.config/bsonv/config.toml`.
pub fn config_path() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".config"))
        .join("bsonv")
        .join("config.toml")
}

fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
