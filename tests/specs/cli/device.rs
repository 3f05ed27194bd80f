// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Device command tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn prints_persisted_device_id() {
    let temp = init_local();

    let output = tally()
        .arg("device")
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let printed = String::from_utf8(output.stdout).unwrap();
    assert_eq!(printed.trim(), device_id(&temp));
}

#[test]
fn device_id_is_stable_across_runs() {
    let temp = TempDir::new().unwrap();

    let first = tally().arg("device").current_dir(temp.path()).output().unwrap();
    let second = tally().arg("device").current_dir(temp.path()).output().unwrap();

    assert!(first.status.success());
    assert!(!first.stdout.is_empty());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn init_keeps_device_id() {
    let temp = TempDir::new().unwrap();
    let before = tally().arg("device").current_dir(temp.path()).output().unwrap();

    tally()
        .args(["init", "--local"])
        .current_dir(temp.path())
        .assert()
        .success();

    let printed = String::from_utf8(before.stdout).unwrap();
    assert_eq!(printed.trim(), device_id(&temp));
}
