// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration management.
//!
//! Configuration is stored in `<state-dir>/config.toml`:
//! - `[remote]`: relay connection settings (absent in local-only mode)
//! - `[sync]`: engine tuning, see [`SyncConfig`]

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_sync::{RemoteConfig, SyncConfig};

use crate::error::{Error, Result};

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".tally";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration stored in `<state-dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Remote store settings. If absent, runs in local-only mode and
    /// mutations stay queued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Creates a config pointing at `url`, or a local-only config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemoteUrl`] if `url` is not a WebSocket URL.
    pub fn new(url: Option<&str>) -> Result<Self> {
        let remote = match url {
            Some(url) => {
                validate_url(url)?;
                Some(RemoteConfig::new(url))
            }
            None => None,
        };
        Ok(Config {
            remote,
            sync: SyncConfig::default(),
        })
    }

    /// Loads configuration from the given state directory.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotInitialized)
            }
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)?;
        if let Some(remote) = &config.remote {
            validate_url(&remote.url)?;
        }
        Ok(config)
    }

    /// Saves configuration to the given state directory.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Returns true if a remote store is configured.
    pub fn is_remote_mode(&self) -> bool {
        self.remote.is_some()
    }

    /// Returns the remote URL if configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.url.as_str())
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("ws://") || url.starts_with("wss://") {
        Ok(())
    } else {
        Err(Error::InvalidRemoteUrl(url.to_string()))
    }
}

/// Initialize a new state directory with a default config.
///
/// An existing directory without a config is reused.
pub fn init_state_dir(state_dir: &Path, url: Option<&str>) -> Result<PathBuf> {
    let config_path = state_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        return Err(Error::AlreadyInitialized(state_dir.display().to_string()));
    }

    let config = Config::new(url)?;
    fs::create_dir_all(state_dir)?;
    config.save(state_dir)?;

    Ok(state_dir.to_path_buf())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
