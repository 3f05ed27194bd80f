// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Drains the operation queue to the remote store.
//!
//! A pass takes the whole live queue, sends each operation in order and
//! puts failures back at the tail. Passes never overlap: a second caller
//! sees [`SkipReason::Busy`] instead of waiting. Failures count against a
//! shared retry budget that pauses automatic drains until the next online
//! transition or manual full sync. An operation that keeps failing is moved
//! to `dead_letter.jsonl` so it cannot block the rest of the queue forever.
//! Attempt counts are kept in `op_attempts.jsonl` so they carry over between
//! processes that each run a single pass.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{jsonl, Clock, DeviceId, OpId, RemotePath, SyncOperation};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::connectivity::ConnectivityState;
use crate::error::SyncResult;
use crate::queue::OperationQueue;
use crate::remote::RemoteStore;

/// File name of the dead-letter log inside the state directory.
pub const DEAD_LETTER_FILE: &str = "dead_letter.jsonl";

/// File name of the persisted per-operation attempt counts.
pub const ATTEMPTS_FILE: &str = "op_attempts.jsonl";

#[derive(Debug, Serialize, Deserialize)]
struct AttemptCount {
    id: OpId,
    attempts: u32,
}

/// An operation given up on after repeated failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetter {
    pub op: SyncOperation,
    pub attempts: u32,
    /// Error from the last attempt.
    pub error: String,
    pub dead_lettered_at: DateTime<Utc>,
}

/// Why a drain request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Offline,
    EmptyQueue,
    Busy,
    RetryBudgetExhausted,
}

/// Counts from one completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Operations confirmed by the remote store.
    pub sent: usize,
    /// Operations that failed and were requeued.
    pub failed: usize,
    /// Operations held back because an earlier operation on the same
    /// record failed in this pass.
    pub deferred: usize,
    /// Operations moved to the dead-letter file.
    pub dead_lettered: usize,
}

/// Result of [`SyncProcessor::drain_queue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Skipped(SkipReason),
    Completed(PassReport),
}

impl DrainOutcome {
    /// Report of the pass, if one ran.
    pub fn report(&self) -> Option<PassReport> {
        match self {
            DrainOutcome::Completed(report) => Some(*report),
            DrainOutcome::Skipped(_) => None,
        }
    }
}

/// Clears the busy flag when a pass ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends queued operations to the remote store.
pub struct SyncProcessor {
    queue: Arc<OperationQueue>,
    remote: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    device: DeviceId,
    connectivity: Arc<ConnectivityState>,
    busy: AtomicBool,
    retries: AtomicU32,
    max_retries: u32,
    max_attempts_per_op: u32,
    attempts: Mutex<HashMap<OpId, u32>>,
    attempts_path: PathBuf,
    dead_letter_path: PathBuf,
}

impl SyncProcessor {
    pub fn new(
        queue: Arc<OperationQueue>,
        remote: Arc<dyn RemoteStore>,
        clock: Arc<dyn Clock>,
        device: DeviceId,
        connectivity: Arc<ConnectivityState>,
        config: &SyncConfig,
        state_dir: &Path,
    ) -> Self {
        let attempts_path = state_dir.join(ATTEMPTS_FILE);
        let attempts = load_attempts(&attempts_path, &queue);
        SyncProcessor {
            queue,
            remote,
            clock,
            device,
            connectivity,
            busy: AtomicBool::new(false),
            retries: AtomicU32::new(0),
            max_retries: config.max_retries,
            max_attempts_per_op: config.max_attempts_per_op.max(1),
            attempts: Mutex::new(attempts),
            attempts_path,
            dead_letter_path: state_dir.join(DEAD_LETTER_FILE),
        }
    }

    /// Runs one drain pass if conditions allow.
    pub async fn drain_queue(&self) -> DrainOutcome {
        if !self.connectivity.is_online() {
            return DrainOutcome::Skipped(SkipReason::Offline);
        }
        if self.retry_budget_exhausted() {
            debug!("retry budget exhausted, skipping drain");
            return DrainOutcome::Skipped(SkipReason::RetryBudgetExhausted);
        }
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return DrainOutcome::Skipped(SkipReason::Busy);
        };
        if self.queue.pending() == 0 {
            return DrainOutcome::Skipped(SkipReason::EmptyQueue);
        }

        let batch = self.queue.drain();
        let mut report = PassReport::default();
        let mut requeue = Vec::new();
        let mut blocked: HashSet<RemotePath> = HashSet::new();

        for op in batch {
            let path = op.remote_path().ok();
            if path.as_ref().is_some_and(|p| blocked.contains(p)) {
                report.deferred += 1;
                requeue.push(op);
                continue;
            }

            match self.send(&op).await {
                Ok(()) => {
                    debug!("sent {} {}/{}", op.kind, op.collection, op.record_id());
                    self.forget_attempts(&op.id);
                    report.sent += 1;
                }
                Err(e) => {
                    self.retries.fetch_add(1, Ordering::AcqRel);
                    let attempts = self.record_attempt(op.id);
                    if attempts >= self.max_attempts_per_op {
                        match self.dead_letter(&op, attempts, &e.to_string()) {
                            Ok(()) => {
                                report.dead_lettered += 1;
                                continue;
                            }
                            Err(write_err) => {
                                warn!("failed to write dead letter for {}: {}", op.id, write_err);
                            }
                        }
                    }
                    warn!(
                        "failed to send {} {}/{} (attempt {}): {}",
                        op.kind,
                        op.collection,
                        op.record_id(),
                        attempts,
                        e
                    );
                    if let Some(path) = path {
                        blocked.insert(path);
                    }
                    report.failed += 1;
                    requeue.push(op);
                }
            }
        }

        if let Err(e) = self.queue.requeue(requeue) {
            warn!("failed to persist sync queue: {}", e);
        }
        self.save_attempts();

        info!(
            "drain pass: {} sent, {} failed, {} deferred, {} dead-lettered",
            report.sent, report.failed, report.deferred, report.dead_lettered
        );
        DrainOutcome::Completed(report)
    }

    async fn send(&self, op: &SyncOperation) -> SyncResult<()> {
        let path = op.remote_path()?;
        if op.kind.is_upsert() {
            let mut record = op.payload.clone();
            record.stamp(self.clock.now(), &self.device);
            record.normalize_temporal();
            self.remote.set(&path, record.to_wire()).await?;
        } else {
            self.remote.remove(&path).await?;
        }
        Ok(())
    }

    fn dead_letter(&self, op: &SyncOperation, attempts: u32, error: &str) -> SyncResult<()> {
        let letter = DeadLetter {
            op: op.clone(),
            attempts,
            error: error.to_string(),
            dead_lettered_at: self.clock.now(),
        };
        jsonl::append(&self.dead_letter_path, &letter)?;
        self.forget_attempts(&op.id);
        warn!(
            "giving up on {} {}/{} after {} attempts; moved to {}",
            op.kind,
            op.collection,
            op.record_id(),
            attempts,
            self.dead_letter_path.display()
        );
        Ok(())
    }

    fn record_attempt(&self, id: OpId) -> u32 {
        let mut attempts = self.lock_attempts();
        let count = attempts.entry(id).or_insert(0);
        *count += 1;
        *count
    }

    fn forget_attempts(&self, id: &OpId) {
        self.lock_attempts().remove(id);
    }

    fn lock_attempts(&self) -> MutexGuard<'_, HashMap<OpId, u32>> {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save_attempts(&self) {
        let mut counts: Vec<AttemptCount> = self
            .lock_attempts()
            .iter()
            .map(|(id, attempts)| AttemptCount { id: *id, attempts: *attempts })
            .collect();
        counts.sort_by_key(|c| c.id);

        let result = if counts.is_empty() {
            match std::fs::remove_file(&self.attempts_path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            }
        } else {
            jsonl::write_all(&self.attempts_path, &counts)
        };
        if let Err(e) = result {
            warn!("failed to persist attempt counts: {}", e);
        }
    }

    /// Clears the shared retry counter.
    pub fn reset_retries(&self) {
        self.retries.store(0, Ordering::Release);
    }

    /// Failures since the counter was last reset.
    pub fn retry_count(&self) -> u32 {
        self.retries.load(Ordering::Acquire)
    }

    pub fn retry_budget_exhausted(&self) -> bool {
        self.retry_count() >= self.max_retries
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Failed attempts recorded for an operation still in the queue.
    pub fn attempts_for(&self, id: &OpId) -> u32 {
        self.lock_attempts().get(id).copied().unwrap_or(0)
    }

    /// Number of operations in the dead-letter file.
    pub fn dead_letter_count(&self) -> usize {
        match jsonl::count(&self.dead_letter_path) {
            Ok(n) => n,
            Err(e) => {
                warn!("failed to read dead-letter file: {}", e);
                0
            }
        }
    }

    /// Every dead-lettered operation, oldest first.
    pub fn dead_letters(&self) -> SyncResult<Vec<DeadLetter>> {
        Ok(jsonl::read_all(&self.dead_letter_path)?)
    }

    pub fn queue(&self) -> &Arc<OperationQueue> {
        &self.queue
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityState> {
        &self.connectivity
    }

    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

/// Reads persisted attempt counts, keeping only operations still queued.
///
/// An unreadable file starts the counts over.
fn load_attempts(path: &Path, queue: &OperationQueue) -> HashMap<OpId, u32> {
    let counts: Vec<AttemptCount> = match jsonl::read_all(path) {
        Ok(counts) => counts,
        Err(e) => {
            warn!("ignoring attempt counts at {}: {}", path.display(), e);
            return HashMap::new();
        }
    };
    let queued: HashSet<OpId> = queue.snapshot().iter().map(|op| op.id).collect();
    counts
        .into_iter()
        .filter(|c| queued.contains(&c.id))
        .map(|c| (c.id, c.attempts))
        .collect()
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
