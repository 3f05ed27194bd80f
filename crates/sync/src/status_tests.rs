// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::SyncConfig;
use crate::test_helpers::{create_receipt, local_device, ts, Harness};
use tempfile::tempdir;

#[test]
fn fresh_state_has_no_full_sync() {
    let dir = tempdir().unwrap();
    assert_eq!(StatusReporter::open(dir.path()).last_full_sync(), None);
}

#[test]
fn full_sync_time_survives_reopen() {
    let dir = tempdir().unwrap();
    let at = ts("2024-03-01T10:00:00.123Z");
    StatusReporter::open(dir.path()).mark_full_sync(at).unwrap();

    assert_eq!(StatusReporter::open(dir.path()).last_full_sync(), Some(at));
    let raw = std::fs::read_to_string(dir.path().join(LAST_FULL_SYNC_FILE)).unwrap();
    assert_eq!(raw, "2024-03-01T10:00:00.123Z");
}

#[test]
fn garbage_file_reads_as_none() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(LAST_FULL_SYNC_FILE), "yesterday").unwrap();
    assert_eq!(StatusReporter::open(dir.path()).last_full_sync(), None);
}

#[test]
fn snapshot_reflects_processor() {
    let h = Harness::new(SyncConfig::default(), false);
    h.enqueue(create_receipt("r1", "2024-01-05T00:00:00Z"));
    h.enqueue(create_receipt("r2", "2024-01-06T00:00:00Z"));
    let reporter = StatusReporter::open(h.dir.path());

    let status = reporter.snapshot(&h.processor);

    assert_eq!(
        status,
        SyncStatus {
            online: false,
            queue_length: 2,
            last_full_sync: None,
            device_id: local_device(),
            draining: false,
            retry_budget_exhausted: false,
            dead_letters: 0,
            queue_resets: 0,
        }
    );
}

#[test]
fn status_serializes_to_json() {
    let status = SyncStatus {
        online: true,
        queue_length: 0,
        last_full_sync: Some(ts("2024-03-01T10:00:00Z")),
        device_id: local_device(),
        draining: false,
        retry_budget_exhausted: false,
        dead_letters: 1,
        queue_resets: 0,
    };

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["online"], true);
    assert_eq!(json["device_id"], "device-local");
    assert_eq!(json["dead_letters"], 1);
}
