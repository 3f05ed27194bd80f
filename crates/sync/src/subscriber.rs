// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Realtime collection subscriptions.
//!
//! Each subscribed collection gets one task that reads full snapshots from
//! the remote store, decodes them into records and hands the records that
//! did not originate on this device to the caller's callback.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tally_core::{Collection, DeviceId, Record, RemotePath};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ResubscribePolicy;
use crate::error::SyncResult;
use crate::remote::RemoteStore;

struct ActiveSubscription {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ActiveSubscription {
    async fn stop(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Holds at most one live subscription per collection.
pub struct RealtimeSubscriber {
    remote: Arc<dyn RemoteStore>,
    device: DeviceId,
    policy: ResubscribePolicy,
    active: Mutex<HashMap<Collection, ActiveSubscription>>,
}

impl RealtimeSubscriber {
    pub fn new(remote: Arc<dyn RemoteStore>, device: DeviceId, policy: ResubscribePolicy) -> Self {
        RealtimeSubscriber {
            remote,
            device,
            policy,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribes to a collection.
    ///
    /// `on_update` receives every remote snapshot, decoded and with this
    /// device's own records removed. It runs on the subscription task and
    /// must not call back into this subscriber.
    ///
    /// Returns `false` if an existing subscription was kept under
    /// [`ResubscribePolicy::Keep`].
    pub async fn subscribe<F>(&self, collection: Collection, on_update: F) -> SyncResult<bool>
    where
        F: Fn(Vec<Record>) + Send + Sync + 'static,
    {
        let mut active = self.active.lock().await;

        if let Some(existing) = active.get(&collection) {
            if self.policy == ResubscribePolicy::Keep && !existing.task.is_finished() {
                debug!("already subscribed to {}, keeping existing subscription", collection);
                return Ok(false);
            }
        }
        if let Some(previous) = active.remove(&collection) {
            debug!("replacing subscription to {}", collection);
            previous.stop().await;
        }

        let path = RemotePath::collection(collection);
        let mut subscription = self.remote.subscribe(&path).await?;
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let device = self.device.clone();

        let task = tokio::spawn(async move {
            loop {
                let snapshot = tokio::select! {
                    _ = token.cancelled() => break,
                    next = subscription.next() => match next {
                        Some(value) => value,
                        None => {
                            debug!("subscription to {} ended", collection);
                            break;
                        }
                    },
                };
                let records = decode_snapshot(collection, snapshot, &device);
                if token.is_cancelled() {
                    break;
                }
                on_update(records);
            }
        });

        active.insert(collection, ActiveSubscription { cancel, task });
        Ok(true)
    }

    /// Cancels the subscription to a collection.
    ///
    /// Once this returns the callback will not be invoked again. Returns
    /// `false` if there was no subscription.
    pub async fn unsubscribe(&self, collection: Collection) -> bool {
        let removed = self.active.lock().await.remove(&collection);
        match removed {
            Some(subscription) => {
                subscription.stop().await;
                debug!("unsubscribed from {}", collection);
                true
            }
            None => false,
        }
    }

    /// Cancels every subscription.
    pub async fn unsubscribe_all(&self) {
        let drained: Vec<_> = self.active.lock().await.drain().collect();
        for (_, subscription) in drained {
            subscription.stop().await;
        }
    }

    pub async fn is_subscribed(&self, collection: Collection) -> bool {
        self.active
            .lock()
            .await
            .get(&collection)
            .is_some_and(|s| !s.task.is_finished())
    }

    /// Collections with a live subscription, in stable order.
    pub async fn subscribed(&self) -> Vec<Collection> {
        let active = self.active.lock().await;
        let mut collections: Vec<Collection> = active
            .iter()
            .filter(|(_, s)| !s.task.is_finished())
            .map(|(c, _)| *c)
            .collect();
        collections.sort();
        collections
    }
}

/// Decodes a collection snapshot into records.
///
/// Accepts an object keyed by record id or an array (null holes skipped).
/// Entries that are not records are logged and skipped. Records stamped by
/// `device` are dropped so local writes never echo back.
pub fn decode_snapshot(collection: Collection, snapshot: Value, device: &DeviceId) -> Vec<Record> {
    let entries: Vec<(Option<String>, Value)> = match snapshot {
        Value::Null => return Vec::new(),
        Value::Object(map) => map.into_iter().map(|(k, v)| (Some(k), v)).collect(),
        Value::Array(items) => items
            .into_iter()
            .filter(|v| !v.is_null())
            .map(|v| (None, v))
            .collect(),
        other => {
            warn!("ignoring {} snapshot that is not an object: {}", collection, other);
            return Vec::new();
        }
    };

    let mut echoes = 0usize;
    let mut records = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match Record::from_wire_keyed(key.as_deref(), value) {
            Ok(record) if record.is_from(device) => echoes += 1,
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("skipping malformed {} entry {}: {}", collection, key.unwrap_or_default(), e)
            }
        }
    }
    if echoes > 0 {
        debug!("filtered {} own records from {} snapshot", echoes, collection);
    }
    records
}

#[cfg(test)]
#[path = "subscriber_tests.rs"]
mod tests;
