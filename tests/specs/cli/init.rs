// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Init command tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn creates_state_directory() {
    let temp = TempDir::new().unwrap();

    tally()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tally"))
        .stdout(predicate::str::contains("Remote: ws://localhost:7890"));

    assert!(temp.path().join(".tally/config.toml").exists());
    assert!(temp.path().join(".tally/device_id").exists());

    let config = std::fs::read_to_string(temp.path().join(".tally/config.toml")).unwrap();
    assert!(config.contains("url = \"ws://localhost:7890\""));
}

#[test]
fn fails_if_already_initialized() {
    let temp = init_local();

    tally()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn local_mode_writes_no_remote() {
    let temp = init_local();

    let config = std::fs::read_to_string(state_dir(&temp).join("config.toml")).unwrap();
    assert!(!config.contains("[remote]"));
    assert!(config.contains("[sync]"));
}

#[test]
fn remote_option_is_saved() {
    let temp = TempDir::new().unwrap();

    tally()
        .args(["init", "--remote", "wss://books.example.com"])
        .current_dir(temp.path())
        .assert()
        .success();

    let config = std::fs::read_to_string(temp.path().join(".tally/config.toml")).unwrap();
    assert!(config.contains("url = \"wss://books.example.com\""));
}

#[test]
fn rejects_non_websocket_url() {
    let temp = TempDir::new().unwrap();

    tally()
        .args(["init", "--remote", "http://books.example.com"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid remote URL"));

    assert!(!temp.path().join(".tally/config.toml").exists());
}

#[test]
fn state_dir_option_creates_at_specified_location() {
    let temp = TempDir::new().unwrap();

    tally()
        .args(["--state-dir", "books/state", "init", "--local"])
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("books/state/config.toml").exists());
    assert!(!temp.path().join(".tally").exists());
}
