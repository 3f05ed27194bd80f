// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote store abstraction.
//!
//! The remote store is a hierarchical JSON tree addressed by
//! [`RemotePath`]s. The engine only needs three things from it: replace the
//! value at a path, remove a path, and stream full snapshots of a path.
//!
//! Two implementations are provided:
//! - [`MemoryRemote`]: in-process tree, used by the relay and by tests
//! - [`WebSocketRemote`]: client for the relay server

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tally_core::RemotePath;
use tokio::sync::mpsc;

mod memory;
mod websocket;

pub use memory::{JournalEntry, MemoryRemote};
pub use websocket::WebSocketRemote;

/// Error type for remote store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed while a request was outstanding.
    #[error("connection closed")]
    ConnectionClosed,

    /// No connection is currently established.
    #[error("not connected to remote store")]
    NotConnected,

    /// The remote store refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The remote store is unavailable.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// A hierarchical remote store.
///
/// Object-safe so the engine can hold an `Arc<dyn RemoteStore>` and tests
/// can substitute fakes.
pub trait RemoteStore: Send + Sync {
    /// Replaces the value at `path`. Writing `null` removes it.
    fn set(&self, path: &RemotePath, value: Value) -> RemoteFuture<'_, ()>;

    /// Removes the value at `path` and everything below it.
    fn remove(&self, path: &RemotePath) -> RemoteFuture<'_, ()>;

    /// Starts streaming snapshots of `path`.
    ///
    /// The current value is delivered first, then the full value again after
    /// every change at, above or below the path.
    fn subscribe(&self, path: &RemotePath) -> RemoteFuture<'_, Subscription>;
}

/// A live stream of snapshots for one path.
///
/// Dropping the subscription stops delivery.
pub struct Subscription {
    path: RemotePath,
    rx: mpsc::UnboundedReceiver<Value>,
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription fed by the given channel.
    pub fn new(path: RemotePath, rx: mpsc::UnboundedReceiver<Value>) -> Self {
        Subscription { path, rx, on_drop: None }
    }

    /// Registers a hook run when the subscription is dropped.
    pub fn with_drop_hook(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_drop = Some(Box::new(hook));
        self
    }

    /// The subscribed path.
    pub fn path(&self) -> &RemotePath {
        &self.path
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the remote side has stopped delivering.
    pub async fn next(&mut self) -> Option<Value> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hook) = self.on_drop.take() {
            hook();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("path", &self.path).finish()
    }
}
