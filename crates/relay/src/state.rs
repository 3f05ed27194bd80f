// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Relay state: the shared record tree.

use serde_json::Value;
use tally_core::RemotePath;
use tally_sync::{MemoryRemote, RemoteResult, Subscription};

/// Shared relay state. Clones share the same tree.
#[derive(Clone, Default)]
pub struct RelayState {
    store: MemoryRemote,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value at `path`; `null` removes it.
    pub fn set(&self, path: &RemotePath, value: Value) -> RemoteResult<()> {
        self.store.apply_set(path, value)
    }

    pub fn remove(&self, path: &RemotePath) -> RemoteResult<()> {
        self.store.apply_remove(path)
    }

    /// Streams snapshots of `path`, starting with its current value.
    pub fn watch(&self, path: &RemotePath) -> RemoteResult<Subscription> {
        self.store.watch(path)
    }

    pub fn get(&self, path: &RemotePath) -> Value {
        self.store.get(path)
    }

    /// Number of live subscriptions across all connections.
    pub fn subscriber_count(&self) -> usize {
        self.store.subscriber_count()
    }
}
