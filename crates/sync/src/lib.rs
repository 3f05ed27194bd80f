// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync engine for tally records.
//!
//! # Architecture
//!
//! ```text
//!  local mutation                         remote store
//!        │                                     ▲   │
//!        ▼                                     │   │ snapshots
//! ┌─────────────┐  drain   ┌─────────────┐     │   ▼
//! │    Queue    │─────────►│  Processor  │─────┘ ┌────────────┐
//! │   (JSONL)   │◄─────────│             │       │ Subscriber │
//! └─────────────┘ requeue  └─────────────┘       └────────────┘
//!                                 ▲                    │
//!                                 │ online / tick      ▼
//!                          ┌─────────────┐       ┌────────────┐
//!                          │Connectivity │       │ Reconciler │──► render
//!                          └─────────────┘       └────────────┘
//! ```
//!
//! [`SyncEngine`] wires the pieces together for one state directory. The
//! remote side is any [`RemoteStore`]: [`MemoryRemote`] in-process, or
//! [`WebSocketRemote`] talking to a `tally-relay` server.

pub mod config;
pub mod connectivity;
pub mod engine;
pub mod error;
pub mod processor;
pub mod queue;
pub mod reconcile;
pub mod remote;
pub mod status;
pub mod subscriber;

pub use config::{MergePolicy, RemoteConfig, ResubscribePolicy, SyncConfig};
pub use connectivity::{ConnectivityMonitor, ConnectivityState, MonitorHandle, Transition};
pub use engine::{FullSyncReport, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use processor::{DeadLetter, DrainOutcome, PassReport, SkipReason, SyncProcessor};
pub use queue::OperationQueue;
pub use remote::{
    MemoryRemote, RemoteError, RemoteResult, RemoteStore, Subscription, WebSocketRemote,
};
pub use status::{StatusReporter, SyncStatus};
pub use subscriber::RealtimeSubscriber;

#[cfg(test)]
mod test_helpers;
