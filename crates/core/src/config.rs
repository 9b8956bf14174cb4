//! Configuration loading utilities
//!
//! Supports loading configuration from multiple sources in priority order:
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Config file (searched in standard locations)
//! 4. Built-in defaults (lowest priority)

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Describes where a configuration was loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Explicit path provided via CLI or env var
    Explicit(PathBuf),
    /// Found in current working directory
    CurrentDir(PathBuf),
    /// Found in XDG config home (~/.config/amedasdl/)
    XdgConfig(PathBuf),
    /// Found in system config (/etc/amedasdl/)
    System(PathBuf),
    /// No config file found, using defaults
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(p) => write!(f, "{}", p.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

/// Find a configuration file in standard locations
///
/// Search order:
/// 1. Environment variable (e.g., AMEDASDL_CONFIG)
/// 2. Current directory (amedasdl.toml)
/// 3. XDG config home ($XDG_CONFIG_HOME/amedasdl/ or ~/.config/amedasdl/)
/// 4. System config (/etc/amedasdl/)
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    env::var_os(env_var)
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .map(ConfigSource::Explicit)
        .or_else(|| {
            search_locations(filename)
                .into_iter()
                .find(|source| source.path().is_some_and(|p| p.exists()))
        })
        .unwrap_or(ConfigSource::Defaults)
}

fn search_locations(filename: &str) -> Vec<ConfigSource> {
    let mut locations = vec![ConfigSource::CurrentDir(PathBuf::from(filename))];
    if let Some(dir) = xdg_config_dir() {
        locations.push(ConfigSource::XdgConfig(dir.join(filename)));
    }
    locations.push(ConfigSource::System(
        Path::new("/etc").join(APP_NAME).join(filename),
    ));
    locations
}

fn xdg_config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join(APP_NAME))
}

/// Load and parse a TOML configuration file
///
/// Returns `T::default()` when the source is [`ConfigSource::Defaults`].
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> anyhow::Result<T> {
    match source.path() {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            let config: T = toml::from_str(&content)
                .with_context(|| format!("failed to parse config file {}", path.display()))?;
            Ok(config)
        }
        None => Ok(T::default()),
    }
}
