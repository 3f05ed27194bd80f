// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable FIFO of operations not yet confirmed by the remote store.
//!
//! The whole queue is rewritten to `sync_queue.jsonl` after every change
//! (temp file, fsync, rename). Operations taken by a drain pass stay on disk
//! as "in flight" until the pass reports back, so a crash mid-pass re-sends
//! rather than loses them.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tally_core::{jsonl, SyncOperation};
use tracing::warn;

use crate::error::SyncResult;

/// File name of the persisted queue inside the state directory.
pub const QUEUE_FILE: &str = "sync_queue.jsonl";

/// Suffix given to a queue file that failed to parse.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

#[derive(Default)]
struct QueueState {
    live: Vec<SyncOperation>,
    in_flight: Vec<SyncOperation>,
}

/// Persisted operation queue.
///
/// Only one drain pass may hold operations at a time; the processor's busy
/// flag enforces this.
pub struct OperationQueue {
    path: PathBuf,
    state: Mutex<QueueState>,
    resets: AtomicU64,
}

impl OperationQueue {
    /// Opens the queue in `state_dir`, loading any persisted operations.
    ///
    /// An unparseable queue file is moved aside to `sync_queue.jsonl.corrupt`
    /// and the queue starts empty. Other I/O errors are returned.
    pub fn open(state_dir: &Path) -> SyncResult<Self> {
        std::fs::create_dir_all(state_dir)?;
        let queue = OperationQueue {
            path: state_dir.join(QUEUE_FILE),
            state: Mutex::new(QueueState::default()),
            resets: AtomicU64::new(0),
        };
        queue.load()?;
        Ok(queue)
    }

    /// Replaces the in-memory queue with the persisted one.
    pub fn load(&self) -> SyncResult<()> {
        let ops = match jsonl::read_all::<SyncOperation>(&self.path) {
            Ok(ops) => ops,
            Err(tally_core::Error::CorruptedData(detail)) => {
                self.quarantine(&detail);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut state = self.lock();
        state.live = ops;
        state.in_flight.clear();
        Ok(())
    }

    fn quarantine(&self, detail: &str) {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(CORRUPT_SUFFIX);
        let corrupt = PathBuf::from(name);
        warn!(
            "sync queue is corrupt ({}); resetting to empty, original kept at {}",
            detail,
            corrupt.display()
        );
        if let Err(e) = std::fs::rename(&self.path, &corrupt) {
            warn!("failed to preserve corrupt queue file: {}", e);
        }
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Appends an operation and persists the queue.
    ///
    /// On a persistence failure the operation stays queued in memory and the
    /// error is returned.
    pub fn enqueue(&self, op: SyncOperation) -> SyncResult<()> {
        let mut state = self.lock();
        state.live.push(op);
        self.write(&state)
    }

    /// Takes every live operation for a drain pass, in FIFO order.
    pub fn drain(&self) -> Vec<SyncOperation> {
        let mut state = self.lock();
        let batch = std::mem::take(&mut state.live);
        state.in_flight.extend(batch.iter().cloned());
        batch
    }

    /// Ends a drain pass: confirmed operations are dropped and `failed` ones
    /// go back at the tail, behind anything enqueued during the pass.
    pub fn requeue(&self, failed: Vec<SyncOperation>) -> SyncResult<()> {
        let mut state = self.lock();
        state.in_flight.clear();
        state.live.extend(failed);
        self.write(&state)
    }

    /// Writes the queue to disk.
    pub fn persist(&self) -> SyncResult<()> {
        let state = self.lock();
        self.write(&state)
    }

    fn write(&self, state: &QueueState) -> SyncResult<()> {
        let all: Vec<&SyncOperation> = state.in_flight.iter().chain(state.live.iter()).collect();
        jsonl::write_all(&self.path, &all)?;
        Ok(())
    }

    /// Operations not yet confirmed, including those in flight.
    pub fn len(&self) -> usize {
        let state = self.lock();
        state.in_flight.len() + state.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live operations waiting for the next pass.
    pub fn pending(&self) -> usize {
        self.lock().live.len()
    }

    /// Copy of every unconfirmed operation in send order.
    pub fn snapshot(&self) -> Vec<SyncOperation> {
        let state = self.lock();
        state.in_flight.iter().chain(state.live.iter()).cloned().collect()
    }

    /// Times the queue was reset because its file was corrupt.
    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
