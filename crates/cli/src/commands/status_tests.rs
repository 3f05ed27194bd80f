// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use std::sync::Arc;
use tally_core::{Collection, DeviceId, OpKind, Record, SystemClock};
use tally_sync::{MemoryRemote, SyncConfig};

fn status() -> SyncStatus {
    SyncStatus {
        online: false,
        queue_length: 2,
        last_full_sync: None,
        device_id: DeviceId::from("device-a"),
        draining: false,
        retry_budget_exhausted: false,
        dead_letters: 0,
        queue_resets: 0,
    }
}

#[test]
fn test_format_status_basic() {
    let out = format_status(&status());
    assert!(out.contains("Device:       device-a"));
    assert!(out.contains("Connection:   offline"));
    assert!(out.contains("Queued:       2"));
    assert!(out.contains("Last sync:    never"));
    assert!(!out.contains("warning"));
    assert!(!out.contains("Dead letters"));
}

#[test]
fn test_format_status_last_sync() {
    let mut s = status();
    s.online = true;
    s.last_full_sync = Some(chrono::Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());

    let out = format_status(&s);
    assert!(out.contains("Connection:   online"));
    assert!(out.contains("Last sync:    2024-03-01T10:00:00.000Z"));
}

#[test]
fn test_format_status_flags() {
    let mut s = status();
    s.retry_budget_exhausted = true;
    s.queue_resets = 1;
    s.dead_letters = 3;

    let out = format_status(&s);
    assert!(out.contains("Dead letters: 3"));
    assert!(out.contains("retry budget exhausted"));
    assert!(out.contains("queue file was corrupt"));
}

#[tokio::test]
async fn test_observe_reports_without_draining() {
    let dir = tempfile::tempdir().unwrap();
    let remote = MemoryRemote::new();
    let engine = SyncEngine::open(
        dir.path(),
        SyncConfig::default(),
        Arc::new(remote.clone()),
        Arc::new(SystemClock),
    )
    .unwrap();
    engine
        .record_change(OpKind::Create, Collection::Receipts, Record::new("r1"))
        .unwrap();

    let status = observe(&engine, true);

    assert!(status.online);
    assert_eq!(status.queue_length, 1);
    assert!(remote.journal().is_empty());
}
