// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine and remote connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What happens when a collection is subscribed while already subscribed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubscribePolicy {
    /// Cancel the existing subscription and start a new one.
    #[default]
    Replace,
    /// Keep the existing subscription; the call is a no-op.
    Keep,
}

/// How an incoming remote record is merged over a local one with the same id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The remote copy always replaces the local copy.
    #[default]
    RemoteWins,
    /// The remote copy replaces the local copy unless it is older.
    NewestWins,
}

/// Sync engine tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Failed operations allowed per online period before auto-drain pauses.
    pub max_retries: u32,
    /// Seconds between periodic drains while online.
    pub drain_interval_secs: u64,
    /// Failures after which a single operation is dead-lettered.
    pub max_attempts_per_op: u32,
    pub resubscribe: ResubscribePolicy,
    pub merge_policy: MergePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            drain_interval_secs: 15,
            max_attempts_per_op: 10,
            resubscribe: ResubscribePolicy::default(),
            merge_policy: MergePolicy::default(),
        }
    }
}

impl SyncConfig {
    pub fn drain_interval(&self) -> Duration {
        Duration::from_secs(self.drain_interval_secs.max(1))
    }
}

/// Configuration for [`WebSocketRemote`](crate::remote::WebSocketRemote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Relay URL, e.g. `ws://localhost:7890`.
    pub url: String,
    /// Initial delay for exponential backoff (milliseconds).
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (seconds).
    pub max_delay_secs: u64,
    /// Timeout for a single connection attempt (milliseconds).
    pub connect_timeout_ms: u64,
    /// Timeout waiting for an `ack` (milliseconds).
    pub request_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:7890".to_string(),
            initial_delay_ms: 100,
            max_delay_secs: 30,
            connect_timeout_ms: 2000,
            request_timeout_ms: 10_000,
        }
    }
}

impl RemoteConfig {
    /// Default configuration pointing at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
