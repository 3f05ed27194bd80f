// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync command tests.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::common::*;
use yare::parameterized;

#[parameterized(
    local_only = { false },
    unreachable = { true },
)]
fn fails_offline_and_keeps_queue(remote: bool) {
    let temp = if remote { init_unreachable() } else { init_local() };
    put(&temp, "receipts", "R1");

    tally()
        .arg("sync")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("offline"));

    assert_eq!(queued_lines(&temp).len(), 1);
    assert!(!state_dir(&temp).join("last_full_sync").exists());
}
