// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine facade.
//!
//! Owns every component for one state directory. Hosts call
//! [`SyncEngine::record_change`] after committing a mutation locally,
//! [`SyncEngine::watch`] to render collections, and
//! [`SyncEngine::status`] / [`SyncEngine::perform_full_sync`] for the status
//! widget.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tally_core::{
    temporal, Clock, Collection, DeviceId, DeviceIdentity, OpId, OpKind, Record, RemotePath,
    SyncOperation,
};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::connectivity::{self, ConnectivityMonitor, ConnectivityState, MonitorHandle, Transition};
use crate::error::{SyncError, SyncResult};
use crate::processor::{DeadLetter, DrainOutcome, SyncProcessor};
use crate::queue::OperationQueue;
use crate::reconcile;
use crate::remote::RemoteStore;
use crate::status::{StatusReporter, SyncStatus};
use crate::subscriber::RealtimeSubscriber;

type VisibleLists = Arc<Mutex<HashMap<Collection, Vec<Record>>>>;

/// Outcome of [`SyncEngine::perform_full_sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullSyncReport {
    pub drain: DrainOutcome,
    pub synced_at: DateTime<Utc>,
}

/// Offline-first sync engine for one device.
pub struct SyncEngine {
    state_dir: PathBuf,
    config: SyncConfig,
    identity: DeviceIdentity,
    clock: Arc<dyn Clock>,
    remote: Arc<dyn RemoteStore>,
    connectivity: Arc<ConnectivityState>,
    processor: Arc<SyncProcessor>,
    subscriber: RealtimeSubscriber,
    status: StatusReporter,
    visible: VisibleLists,
}

impl SyncEngine {
    /// Opens the engine on `state_dir`, loading the device id and queue.
    ///
    /// The engine starts offline; feed it connectivity with
    /// [`set_online`](Self::set_online) or [`start_monitor`](Self::start_monitor).
    pub fn open(
        state_dir: &Path,
        config: SyncConfig,
        remote: Arc<dyn RemoteStore>,
        clock: Arc<dyn Clock>,
    ) -> SyncResult<Self> {
        let identity = DeviceIdentity::load_or_create(state_dir);
        let queue = Arc::new(OperationQueue::open(state_dir)?);
        let connectivity = Arc::new(ConnectivityState::new(false));
        let processor = Arc::new(SyncProcessor::new(
            Arc::clone(&queue),
            Arc::clone(&remote),
            Arc::clone(&clock),
            identity.id.clone(),
            Arc::clone(&connectivity),
            &config,
            state_dir,
        ));
        let subscriber =
            RealtimeSubscriber::new(Arc::clone(&remote), identity.id.clone(), config.resubscribe);

        info!(
            "sync engine opened at {} (device {}, {} queued)",
            state_dir.display(),
            identity.id,
            queue.len()
        );

        Ok(SyncEngine {
            state_dir: state_dir.to_path_buf(),
            config,
            identity,
            clock,
            remote,
            connectivity,
            processor,
            subscriber,
            status: StatusReporter::open(state_dir),
            visible: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.identity.id
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn processor(&self) -> &Arc<SyncProcessor> {
        &self.processor
    }

    /// Queues an operation and, when online, starts a drain in the
    /// background.
    ///
    /// Only validation and local persistence errors are returned; remote
    /// failures are retried later.
    pub fn enqueue(&self, op: SyncOperation) -> SyncResult<()> {
        op.payload.validate()?;
        op.remote_path()?;

        self.processor.queue().enqueue(op.clone())?;
        debug!("queued {} {}/{}", op.kind, op.collection, op.record_id());
        self.apply_local(&op);

        if self.connectivity.is_online() {
            self.spawn_drain();
        }
        Ok(())
    }

    /// Builds an operation for a committed local change and queues it.
    pub fn record_change(
        &self,
        kind: OpKind,
        collection: Collection,
        record: Record,
    ) -> SyncResult<OpId> {
        let op = SyncOperation::new(
            kind,
            collection,
            record,
            self.identity.id.clone(),
            self.clock.now(),
        );
        let id = op.id;
        self.enqueue(op)?;
        Ok(id)
    }

    fn apply_local(&self, op: &SyncOperation) {
        let mut lists = lock(&self.visible);
        let Some(list) = lists.get_mut(&op.collection) else {
            return;
        };
        list.retain(|r| r.id != op.payload.id);
        if op.kind.is_upsert() {
            list.push(op.payload.clone());
            reconcile::sort_for_display(list);
        }
    }

    fn spawn_drain(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let processor = Arc::clone(&self.processor);
                handle.spawn(async move {
                    processor.drain_queue().await;
                });
            }
            Err(_) => debug!("no async runtime, leaving drain to the monitor"),
        }
    }

    /// Applies a connectivity reading; coming online drains before
    /// returning.
    pub async fn set_online(&self, online: bool) -> Transition {
        connectivity::apply_signal(&self.processor, online).await
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Spawns a monitor following `signal` with the configured drain
    /// interval.
    pub fn start_monitor(&self, signal: watch::Receiver<bool>) -> MonitorHandle {
        ConnectivityMonitor::spawn(
            Arc::clone(&self.processor),
            signal,
            self.config.drain_interval(),
        )
    }

    /// Runs a drain pass now.
    pub async fn drain_now(&self) -> DrainOutcome {
        self.processor.drain_queue().await
    }

    /// Subscribes to a collection and keeps its visible list reconciled.
    ///
    /// `on_render` receives the merged list after every remote snapshot.
    pub async fn watch<F>(&self, collection: Collection, on_render: F) -> SyncResult<bool>
    where
        F: Fn(&[Record]) + Send + Sync + 'static,
    {
        lock(&self.visible).entry(collection).or_default();

        let visible = Arc::clone(&self.visible);
        let policy = self.config.merge_policy;
        self.subscriber
            .subscribe(collection, move |incoming| {
                let merged = {
                    let mut lists = lock(&visible);
                    let current = lists.entry(collection).or_default();
                    *current = reconcile::merge_with(policy, current, &incoming);
                    current.clone()
                };
                on_render(&merged);
            })
            .await
    }

    /// Current visible list for a collection.
    pub fn visible(&self, collection: Collection) -> Vec<Record> {
        lock(&self.visible).get(&collection).cloned().unwrap_or_default()
    }

    /// Stops watching a collection. No render happens after this returns.
    pub async fn unwatch(&self, collection: Collection) -> bool {
        self.subscriber.unsubscribe(collection).await
    }

    pub async fn unwatch_all(&self) {
        self.subscriber.unsubscribe_all().await;
    }

    pub fn status(&self) -> SyncStatus {
        self.status.snapshot(&self.processor)
    }

    pub fn dead_letters(&self) -> SyncResult<Vec<DeadLetter>> {
        self.processor.dead_letters()
    }

    /// Resets the retry budget, drains, then writes this device's heartbeat.
    ///
    /// Fails with [`SyncError::Offline`] when offline. Progress made by the
    /// drain is kept even if the heartbeat write fails.
    pub async fn perform_full_sync(&self) -> SyncResult<FullSyncReport> {
        if !self.connectivity.is_online() {
            return Err(SyncError::Offline);
        }

        self.processor.reset_retries();
        let drain = self.processor.drain_queue().await;

        let now = self.clock.now();
        let heartbeat = RemotePath::heartbeat(&self.identity.id)?;
        self.remote
            .set(&heartbeat, Value::String(temporal::format_timestamp(&now)))
            .await?;
        self.status.mark_full_sync(now)?;

        info!("full sync complete at {}", temporal::format_timestamp(&now));
        Ok(FullSyncReport {
            drain,
            synced_at: now,
        })
    }
}

fn lock(visible: &VisibleLists) -> MutexGuard<'_, HashMap<Collection, Vec<Record>>> {
    visible.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
