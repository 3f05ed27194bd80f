// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Utc};
use tally_core::{Collection, DeviceId, OpKind, Record, SyncOperation};

/// Parses an RFC 3339 timestamp.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Device id used as "this device" in tests.
pub fn local_device() -> DeviceId {
    DeviceId::from("device-local")
}

/// Device id used as "another device" in tests.
pub fn other_device() -> DeviceId {
    DeviceId::from("device-other")
}

/// A receipt dated `date` (RFC 3339).
pub fn receipt(id: &str, date: &str) -> Record {
    Record::new(id)
        .with_field("date", ts(date))
        .with_field("amount", 12.5)
        .with_field("vendor", "Corner Shop")
}

/// A receipt as another device would have written it remotely.
pub fn remote_receipt(id: &str, date: &str, device: &DeviceId, modified: &str) -> Record {
    let mut record = receipt(id, date);
    record.stamp(ts(modified), device);
    record
}

/// Creates an operation authored by [`local_device`].
pub fn make_op(kind: OpKind, collection: Collection, payload: Record) -> SyncOperation {
    SyncOperation::new(kind, collection, payload, local_device(), ts("2024-03-01T09:00:00Z"))
}

/// Creates a receipt create operation.
pub fn create_receipt(id: &str, date: &str) -> SyncOperation {
    make_op(OpKind::Create, Collection::Receipts, receipt(id, date))
}

/// Creates a receipt delete operation.
pub fn delete_receipt(id: &str) -> SyncOperation {
    make_op(OpKind::Delete, Collection::Receipts, Record::new(id))
}

/// A processor wired to an in-memory remote inside a temp state dir.
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub remote: crate::remote::MemoryRemote,
    pub clock: std::sync::Arc<tally_core::ManualClock>,
    pub processor: std::sync::Arc<crate::processor::SyncProcessor>,
}

impl Harness {
    pub fn new(config: crate::config::SyncConfig, online: bool) -> Self {
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let remote = crate::remote::MemoryRemote::new();
        let clock = Arc::new(tally_core::ManualClock::new(ts("2024-03-01T10:00:00Z")));
        let queue = Arc::new(crate::queue::OperationQueue::open(dir.path()).unwrap());
        let connectivity = Arc::new(crate::connectivity::ConnectivityState::new(online));
        let processor = Arc::new(crate::processor::SyncProcessor::new(
            queue,
            Arc::new(remote.clone()),
            clock.clone(),
            local_device(),
            connectivity,
            &config,
            dir.path(),
        ));
        Harness {
            dir,
            remote,
            clock,
            processor,
        }
    }

    pub fn enqueue(&self, op: SyncOperation) {
        self.processor.queue().enqueue(op).unwrap();
    }

    /// A fresh online processor over the same state dir and remote, as a
    /// new process would open it.
    pub fn reopen(
        &self,
        config: &crate::config::SyncConfig,
    ) -> std::sync::Arc<crate::processor::SyncProcessor> {
        use std::sync::Arc;

        let queue = Arc::new(crate::queue::OperationQueue::open(self.dir.path()).unwrap());
        Arc::new(crate::processor::SyncProcessor::new(
            queue,
            Arc::new(self.remote.clone()),
            self.clock.clone(),
            local_device(),
            Arc::new(crate::connectivity::ConnectivityState::new(true)),
            config,
            self.dir.path(),
        ))
    }
}
