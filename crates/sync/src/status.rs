// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregate sync status for the host UI.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::{temporal, DeviceId};

use crate::error::SyncResult;
use crate::processor::SyncProcessor;

/// File holding the time of the last successful full sync.
pub const LAST_FULL_SYNC_FILE: &str = "last_full_sync";

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub online: bool,
    /// Operations not yet confirmed by the remote store.
    pub queue_length: usize,
    pub last_full_sync: Option<DateTime<Utc>>,
    pub device_id: DeviceId,
    /// A drain pass is running.
    pub draining: bool,
    /// Automatic drains are paused until reconnect or a manual sync.
    pub retry_budget_exhausted: bool,
    pub dead_letters: usize,
    /// Times the queue was reset because its file was corrupt.
    pub queue_resets: u64,
}

/// Tracks the last full sync and assembles [`SyncStatus`].
pub struct StatusReporter {
    path: PathBuf,
    last_full_sync: Mutex<Option<DateTime<Utc>>>,
}

impl StatusReporter {
    /// Loads the last full sync time from `state_dir`, if recorded.
    pub fn open(state_dir: &Path) -> Self {
        let path = state_dir.join(LAST_FULL_SYNC_FILE);
        let last = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| temporal::parse_timestamp(s.trim()));
        StatusReporter {
            path,
            last_full_sync: Mutex::new(last),
        }
    }

    pub fn last_full_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_full_sync.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Records a successful full sync with fsync for durability.
    pub fn mark_full_sync(&self, at: DateTime<Utc>) -> SyncResult<()> {
        *self.last_full_sync.lock().unwrap_or_else(|e| e.into_inner()) = Some(at);
        let mut file = std::fs::File::create(&self.path)?;
        write!(file, "{}", temporal::format_timestamp(&at))?;
        file.sync_all()?;
        Ok(())
    }

    pub fn snapshot(&self, processor: &SyncProcessor) -> SyncStatus {
        SyncStatus {
            online: processor.connectivity().is_online(),
            queue_length: processor.queue().len(),
            last_full_sync: self.last_full_sync(),
            device_id: processor.device().clone(),
            draining: processor.is_busy(),
            retry_budget_exhausted: processor.retry_budget_exhausted(),
            dead_letters: processor.dead_letter_count(),
            queue_resets: processor.queue().resets(),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
