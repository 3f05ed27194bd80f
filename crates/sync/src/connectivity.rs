// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Online/offline tracking and drain scheduling.
//!
//! [`ConnectivityState`] is the lock-free online flag shared by the
//! processor, the engine and the status reporter. [`ConnectivityMonitor`]
//! is a background task that follows a connectivity signal: on every
//! offline→online transition it resets the retry budget and drains, and
//! while online it drains on a fixed interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::processor::{DrainOutcome, SyncProcessor};

/// Result of updating the online flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    CameOnline,
    WentOffline,
    Unchanged,
}

/// Shared online flag.
#[derive(Debug, Default)]
pub struct ConnectivityState {
    online: AtomicBool,
}

impl ConnectivityState {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Sets the flag and reports which edge, if any, was crossed.
    pub fn set_online(&self, online: bool) -> Transition {
        let was = self.online.swap(online, Ordering::AcqRel);
        match (was, online) {
            (false, true) => Transition::CameOnline,
            (true, false) => Transition::WentOffline,
            _ => Transition::Unchanged,
        }
    }
}

/// Applies a connectivity reading.
///
/// Coming online resets the retry budget and runs a drain pass before
/// returning.
pub async fn apply_signal(processor: &SyncProcessor, online: bool) -> Transition {
    let transition = processor.connectivity().set_online(online);
    match transition {
        Transition::CameOnline => {
            info!("connectivity restored, draining queue");
            processor.reset_retries();
            log_outcome(processor.drain_queue().await);
        }
        Transition::WentOffline => {
            info!("connectivity lost, operations will queue locally");
        }
        Transition::Unchanged => {}
    }
    transition
}

fn log_outcome(outcome: DrainOutcome) {
    if let DrainOutcome::Skipped(reason) = outcome {
        debug!("drain skipped: {:?}", reason);
    }
}

/// Handle to a running monitor task.
pub struct MonitorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stops the monitor and waits for it to exit.
    ///
    /// A drain pass already in progress is allowed to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Background task driving drains from a connectivity signal.
pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    /// Spawns the monitor.
    ///
    /// The current signal value is applied immediately. If the signal's
    /// sender goes away the last value stays in effect and the periodic
    /// drain keeps running.
    pub fn spawn(
        processor: Arc<SyncProcessor>,
        signal: watch::Receiver<bool>,
        interval: Duration,
    ) -> MonitorHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(processor, signal, interval, cancel.clone()));
        MonitorHandle { cancel, task }
    }
}

async fn run(
    processor: Arc<SyncProcessor>,
    mut signal: watch::Receiver<bool>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let initial = *signal.borrow_and_update();
    apply_signal(&processor, initial).await;

    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut signal_open = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = signal.changed(), if signal_open => match changed {
                Ok(()) => {
                    let online = *signal.borrow_and_update();
                    apply_signal(&processor, online).await;
                }
                Err(_) => {
                    debug!("connectivity signal closed");
                    signal_open = false;
                }
            },
            _ = ticker.tick() => {
                if processor.connectivity().is_online() && !processor.queue().is_empty() {
                    log_outcome(processor.drain_queue().await);
                }
            }
        }
    }

    debug!("connectivity monitor stopped");
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
