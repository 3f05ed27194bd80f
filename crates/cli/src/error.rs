// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the tally CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'tally init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("invalid field '{0}'\n  hint: fields are written as key=value")]
    InvalidField(String),

    #[error("invalid remote URL '{0}': must be ws:// or wss://")]
    InvalidRemoteUrl(String),

    #[error("offline: cannot reach the remote store\n  hint: check that the relay is running and the remote url in config.toml")]
    Offline,

    #[error("config error: {0}")]
    Config(String),

    #[error("sync error: {0}")]
    Sync(tally_sync::SyncError),

    #[error(transparent)]
    Core(#[from] tally_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<tally_sync::SyncError> for Error {
    fn from(e: tally_sync::SyncError) -> Self {
        match e {
            tally_sync::SyncError::Offline => Error::Offline,
            tally_sync::SyncError::Core(e) => Error::Core(e),
            tally_sync::SyncError::Io(e) => Error::Io(e),
            other => Error::Sync(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
