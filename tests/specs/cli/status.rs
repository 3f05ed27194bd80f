// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Status command tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn json_reports_queue_with_unreachable_relay() {
    let temp = init_unreachable();
    put(&temp, "receipts", "R1");
    put(&temp, "receipts", "R2");

    let output = tally()
        .args(["status", "--json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["online"], false);
    assert_eq!(status["queue_length"], 2);
    assert_eq!(status["last_full_sync"], serde_json::Value::Null);
    assert_eq!(status["device_id"], device_id(&temp).as_str());
    assert_eq!(status["retry_budget_exhausted"], false);
    assert_eq!(status["queue_resets"], 0);
}

#[test]
fn text_output() {
    let temp = init_local();
    put(&temp, "clients", "C1");

    tally()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Connection:   offline"))
        .stdout(predicate::str::contains("Queued:       1"))
        .stdout(predicate::str::contains("Last sync:    never"));
}

#[test]
fn corrupt_queue_is_reported_and_kept() {
    let temp = init_local();
    std::fs::write(
        state_dir(&temp).join("sync_queue.jsonl"),
        "{\"not\": \"an op\"}\n",
    )
    .unwrap();

    tally()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued:       0"))
        .stdout(predicate::str::contains("queue file was corrupt"));

    assert!(state_dir(&temp).join("sync_queue.jsonl.corrupt").exists());
}
