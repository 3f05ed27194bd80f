// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Argument and state errors shared by all commands.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[parameterized(
    put = { &["put", "invoices", "I1"] },
    delete = { &["delete", "invoices", "I1"] },
    watch = { &["watch", "invoices", "--once"] },
)]
fn unknown_collection_is_rejected(args: &[&str]) {
    let temp = init_local();

    tally()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown collection"))
        .stderr(predicate::str::contains("receipts"));
}

#[parameterized(
    status = { &["status"] },
    sync = { &["sync"] },
    delete = { &["delete", "receipts", "R1"] },
    watch = { &["watch", "receipts", "--once"] },
)]
fn commands_require_init(args: &[&str]) {
    let temp = TempDir::new().unwrap();

    tally()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn malformed_config_is_reported() {
    let temp = init_local();
    std::fs::write(state_dir(&temp).join("config.toml"), "[sync\n").unwrap();

    tally()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn missing_subcommand_fails() {
    tally().assert().failure();
}
