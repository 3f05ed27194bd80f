// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delete command tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn queues_delete_after_create() {
    let temp = init_local();
    put(&temp, "documents", "D1");

    tally()
        .args(["delete", "documents", "D1"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued delete documents/D1"))
        .stdout(predicate::str::contains("2 change(s) queued (offline)"));

    let lines = queued_lines(&temp);
    assert_eq!(lines.len(), 2);
    let op: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(op["kind"], "delete");
    assert_eq!(op["payload"]["id"], "D1");
}

#[test]
fn offline_flag_skips_relay() {
    let temp = init_unreachable();

    tally()
        .args(["delete", "employees", "EMP1", "--offline"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("relay unreachable").not());

    assert_eq!(queued_lines(&temp).len(), 1);
}
