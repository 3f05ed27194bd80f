// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod delete;
pub mod device;
pub mod init;
pub mod put;
pub mod status;
pub mod sync;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use tally_core::SystemClock;
use tally_sync::{MemoryRemote, RemoteStore, SyncEngine, SyncStatus, WebSocketRemote};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;

/// An opened engine plus its relay connection, if any.
pub struct Session {
    pub engine: SyncEngine,
    relay: Option<Arc<WebSocketRemote>>,
    connected: bool,
}

impl Session {
    /// Loads the config and opens the engine.
    ///
    /// With `connect` set and a remote configured, waits up to the connect
    /// timeout for the relay. Failure to connect is not an error: the
    /// session runs offline and changes stay queued.
    pub async fn open(state_dir: &Path, connect: bool) -> Result<Self> {
        let config = Config::load(state_dir)?;

        let (remote, relay): (Arc<dyn RemoteStore>, Option<Arc<WebSocketRemote>>) =
            match (&config.remote, connect) {
                (Some(remote_config), true) => {
                    let relay = Arc::new(WebSocketRemote::spawn(remote_config.clone()));
                    let remote: Arc<dyn RemoteStore> = relay.clone();
                    (remote, Some(relay))
                }
                // Never written to: the engine stays offline without a relay.
                _ => {
                    let remote: Arc<dyn RemoteStore> = Arc::new(MemoryRemote::new());
                    (remote, None)
                }
            };

        let connected = match (&relay, &config.remote) {
            (Some(relay), Some(remote_config)) => {
                let up = relay.wait_connected(remote_config.connect_timeout()).await;
                if !up {
                    warn!("relay unreachable at {}, running offline", remote_config.url);
                }
                up
            }
            _ => {
                debug!("not connecting to a relay");
                false
            }
        };

        let engine = SyncEngine::open(state_dir, config.sync, remote, Arc::new(SystemClock))?;
        Ok(Session {
            engine,
            relay,
            connected,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Link state of the relay connection, for the connectivity monitor.
    pub fn link(&self) -> Option<tokio::sync::watch::Receiver<bool>> {
        self.relay.as_ref().map(|relay| relay.link())
    }

    /// Marks the engine online if connected, draining the queue, and
    /// returns the resulting status.
    pub async fn settle(&self) -> SyncStatus {
        if self.connected {
            self.engine.set_online(true).await;
        }
        self.engine.status()
    }

    pub async fn close(self) {
        self.engine.unwatch_all().await;
        if let Some(relay) = &self.relay {
            relay.shutdown();
        }
    }
}

/// Prints where queued changes stand after a mutation.
pub(crate) fn print_queue_state(status: &SyncStatus) {
    if status.queue_length == 0 {
        println!("Synced");
    } else if status.online {
        println!("{} change(s) pending, will retry", status.queue_length);
    } else {
        println!("{} change(s) queued (offline)", status.queue_length);
    }
}
