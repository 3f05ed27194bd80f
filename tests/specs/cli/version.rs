// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Version and help tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[test]
fn version_flag_outputs_version() {
    tally()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("tally "));
}

#[parameterized(
    init = { "init" },
    put = { "put" },
    delete = { "delete" },
    sync = { "sync" },
    status = { "status" },
    watch = { "watch" },
    device = { "device" },
)]
fn help_lists_command(command: &str) {
    tally()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(command));
}

#[test]
fn put_help_shows_examples() {
    tally()
        .args(["put", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples:"));
}
