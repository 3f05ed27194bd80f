// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test files,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use std::path::PathBuf;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// A relay address nothing listens on.
pub const UNREACHABLE_RELAY: &str = "ws://127.0.0.1:9";

pub fn tally() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("tally").unwrap()
}

/// Helper to create an initialized temp directory (local-only mode)
pub fn init_local() -> TempDir {
    let temp = TempDir::new().unwrap();
    tally()
        .args(["init", "--local"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory whose relay is down.
///
/// The connect timeout is shortened so commands fall back to offline fast.
pub fn init_unreachable() -> TempDir {
    let temp = TempDir::new().unwrap();
    tally()
        .args(["init", "--remote", UNREACHABLE_RELAY])
        .current_dir(temp.path())
        .assert()
        .success();
    std::fs::write(
        state_dir(&temp).join("config.toml"),
        format!("[remote]\nurl = \"{}\"\nconnect_timeout_ms = 200\n", UNREACHABLE_RELAY),
    )
    .unwrap();
    temp
}

pub fn state_dir(temp: &TempDir) -> PathBuf {
    temp.path().join(".tally")
}

/// Lines in the persisted operation queue.
pub fn queued_lines(temp: &TempDir) -> Vec<String> {
    match std::fs::read_to_string(state_dir(temp).join("sync_queue.jsonl")) {
        Ok(content) => content.lines().map(String::from).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn device_id(temp: &TempDir) -> String {
    std::fs::read_to_string(state_dir(temp).join("device_id")).unwrap()
}

/// Helper to queue a record in local mode
pub fn put(temp: &TempDir, collection: &str, id: &str) {
    tally()
        .args(["put", collection, id])
        .current_dir(temp.path())
        .assert()
        .success();
}
