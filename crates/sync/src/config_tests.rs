// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn sync_defaults() {
    let config = SyncConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.drain_interval_secs, 15);
    assert_eq!(config.max_attempts_per_op, 10);
    assert_eq!(config.resubscribe, ResubscribePolicy::Replace);
    assert_eq!(config.merge_policy, MergePolicy::RemoteWins);
}

#[test]
fn empty_toml_uses_defaults() {
    let config: SyncConfig = toml::from_str("").unwrap();
    assert_eq!(config, SyncConfig::default());
}

#[test]
fn partial_toml_overrides_only_given_fields() {
    let config: SyncConfig = toml::from_str(
        r#"
        max_retries = 5
        merge_policy = "newest_wins"
        "#,
    )
    .unwrap();

    assert_eq!(config.max_retries, 5);
    assert_eq!(config.merge_policy, MergePolicy::NewestWins);
    assert_eq!(config.drain_interval_secs, 15);
}

#[parameterized(
    replace = { "replace", ResubscribePolicy::Replace },
    keep = { "keep", ResubscribePolicy::Keep },
)]
fn resubscribe_policy_from_toml(raw: &str, expected: ResubscribePolicy) {
    let config: SyncConfig = toml::from_str(&format!("resubscribe = \"{raw}\"")).unwrap();
    assert_eq!(config.resubscribe, expected);
}

#[test]
fn unknown_policy_is_rejected() {
    let result: Result<SyncConfig, _> = toml::from_str("merge_policy = \"local_wins\"");
    assert!(result.is_err());
}

#[test]
fn zero_interval_is_clamped() {
    let config = SyncConfig {
        drain_interval_secs: 0,
        ..SyncConfig::default()
    };
    assert_eq!(config.drain_interval(), Duration::from_secs(1));
}

#[test]
fn remote_config_new_keeps_defaults() {
    let config = RemoteConfig::new("ws://relay:9000");
    assert_eq!(config.url, "ws://relay:9000");
    assert_eq!(config.initial_delay_ms, 100);
    assert_eq!(config.max_delay_secs, 30);
    assert_eq!(config.connect_timeout(), Duration::from_millis(2000));
}
