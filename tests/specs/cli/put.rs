// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Put command tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[test]
fn queues_while_offline() {
    let temp = init_local();

    tally()
        .args(["put", "receipts", "R1", "-f", "date=2024-03-01", "-f", "amount=12.5"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued create receipts/R1"))
        .stdout(predicate::str::contains("1 change(s) queued (offline)"));

    let lines = queued_lines(&temp);
    assert_eq!(lines.len(), 1);
    let op: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(op["kind"], "create");
    assert_eq!(op["collection"], "receipts");
    assert_eq!(op["payload"]["id"], "R1");
    assert_eq!(op["payload"]["amount"], 12.5);
}

#[test]
fn queue_keeps_order_across_runs() {
    let temp = init_local();

    put(&temp, "receipts", "R1");
    put(&temp, "clients", "C1");
    put(&temp, "receipts", "R2");

    let ids: Vec<String> = queued_lines(&temp)
        .iter()
        .map(|line| {
            let op: serde_json::Value = serde_json::from_str(line).unwrap();
            op["payload"]["id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids, vec!["R1", "C1", "R2"]);
}

#[test]
fn update_flag_queues_update() {
    let temp = init_local();

    tally()
        .args(["put", "clients", "C7", "-f", "name=Acme", "--update"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued update clients/C7"));
}

#[test]
fn unreachable_relay_still_queues() {
    let temp = init_unreachable();

    tally()
        .args(["put", "expenses", "E1", "-f", "amount=40"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("queued (offline)"));

    assert_eq!(queued_lines(&temp).len(), 1);
}

#[parameterized(
    missing_equals = { "amount" },
    empty_name = { "=12" },
    id_override = { "id=R9" },
)]
fn rejects_invalid_field(field: &str) {
    let temp = init_local();

    tally()
        .args(["put", "receipts", "R1", "-f", field])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid field"));

    assert!(queued_lines(&temp).is_empty());
}

#[test]
fn rejects_id_with_path_characters() {
    let temp = init_local();

    tally()
        .args(["put", "receipts", "R.1"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path segment"));

    assert!(queued_lines(&temp).is_empty());
}

#[test]
fn requires_init() {
    let temp = TempDir::new().unwrap();

    tally()
        .args(["put", "receipts", "R1"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}
