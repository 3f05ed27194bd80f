// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Watch command tests.
//!
//! Live updates are covered by the relay's end-to-end tests; here the
//! command runs without a relay and exits after the first render.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;

#[test]
fn once_prints_empty_collection() {
    let temp = init_local();

    tally()
        .args(["watch", "receipts", "--once"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("receipts (0)"));
}

#[test]
fn once_json_prints_no_lines_for_empty_collection() {
    let temp = init_local();

    tally()
        .args(["watch", "clients", "--once", "--json"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
