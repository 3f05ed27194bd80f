// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket client for the relay server.
//!
//! A single background task owns the socket. It connects with exponential
//! backoff, routes `ack`/`error` responses to waiting requests, fans
//! snapshots out to local subscriptions and re-subscribes every active path
//! after a reconnect. Link state is published on a `watch` channel so it can
//! drive the connectivity monitor.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, StreamExt};
use futures_util::SinkExt;
use serde_json::Value;
use tally_core::protocol::{ClientMessage, ServerMessage};
use tally_core::RemotePath;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{RemoteError, RemoteFuture, RemoteResult, RemoteStore, Subscription};
use crate::config::RemoteConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

enum Command {
    Request {
        id: u64,
        frame: String,
        reply: oneshot::Sender<RemoteResult<()>>,
    },
    Subscribe {
        key: u64,
        path: RemotePath,
        tx: mpsc::UnboundedSender<Value>,
    },
    Unsubscribe {
        key: u64,
    },
}

/// Remote store backed by a relay server connection.
///
/// Requests made while the link is down fail fast with
/// [`RemoteError::NotConnected`]; subscriptions survive reconnects.
pub struct WebSocketRemote {
    commands: mpsc::UnboundedSender<Command>,
    link: watch::Receiver<bool>,
    next_id: AtomicU64,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl WebSocketRemote {
    /// Starts the connection task. Must be called from within a tokio runtime.
    pub fn spawn(config: RemoteConfig) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (link_tx, link) = watch::channel(false);
        let cancel = CancellationToken::new();
        let request_timeout = config.request_timeout();

        tokio::spawn(run(config, command_rx, link_tx, cancel.clone()));

        WebSocketRemote {
            commands,
            link,
            next_id: AtomicU64::new(1),
            request_timeout,
            cancel,
        }
    }

    /// Returns a receiver tracking whether the socket is connected.
    pub fn link(&self) -> watch::Receiver<bool> {
        self.link.clone()
    }

    pub fn is_connected(&self) -> bool {
        *self.link.borrow()
    }

    /// Waits up to `timeout` for the link to come up.
    pub async fn wait_connected(&self, timeout: Duration) -> bool {
        let mut link = self.link.clone();
        let wait = async move { link.wait_for(|up| *up).await.is_ok() };
        tokio::time::timeout(timeout, wait).await.unwrap_or(false)
    }

    /// Stops the connection task. Active subscriptions end.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    async fn request(&self, id: u64, frame: String) -> RemoteResult<()> {
        if !self.is_connected() {
            return Err(RemoteError::NotConnected);
        }

        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Request { id, frame, reply })
            .map_err(|_| RemoteError::ConnectionClosed)?;

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(RemoteError::ConnectionClosed),
            Err(_) => Err(RemoteError::Unavailable(format!("request {id} timed out"))),
        }
    }
}

impl Drop for WebSocketRemote {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl RemoteStore for WebSocketRemote {
    fn set(&self, path: &RemotePath, value: Value) -> RemoteFuture<'_, ()> {
        let path = path.clone();
        Box::pin(async move {
            let id = self.next_id();
            let frame = ClientMessage::set(id, path, value)
                .to_json()
                .map_err(|e| RemoteError::Serialization(e.to_string()))?;
            self.request(id, frame).await
        })
    }

    fn remove(&self, path: &RemotePath) -> RemoteFuture<'_, ()> {
        let path = path.clone();
        Box::pin(async move {
            let id = self.next_id();
            let frame = ClientMessage::remove(id, path)
                .to_json()
                .map_err(|e| RemoteError::Serialization(e.to_string()))?;
            self.request(id, frame).await
        })
    }

    fn subscribe(&self, path: &RemotePath) -> RemoteFuture<'_, Subscription> {
        let path = path.clone();
        Box::pin(async move {
            let key = self.next_id();
            let (tx, rx) = mpsc::unbounded_channel();
            self.commands
                .send(Command::Subscribe {
                    key,
                    path: path.clone(),
                    tx,
                })
                .map_err(|_| RemoteError::ConnectionClosed)?;

            let commands = self.commands.clone();
            Ok(Subscription::new(path, rx).with_drop_hook(move || {
                let _ = commands.send(Command::Unsubscribe { key });
            }))
        })
    }
}

/// Why a connected session ended.
enum SessionEnd {
    Shutdown,
    Disconnected(String),
}

struct LocalSubscriber {
    path: RemotePath,
    tx: mpsc::UnboundedSender<Value>,
}

/// Connection-independent routing state, kept across reconnects.
#[derive(Default)]
struct Router {
    locals: HashMap<u64, LocalSubscriber>,
    snapshots: HashMap<RemotePath, Value>,
    pending: HashMap<u64, oneshot::Sender<RemoteResult<()>>>,
}

impl Router {
    fn has_path(&self, path: &RemotePath) -> bool {
        self.locals.values().any(|l| &l.path == path)
    }

    fn active_paths(&self) -> Vec<RemotePath> {
        let mut paths: Vec<RemotePath> = self.locals.values().map(|l| l.path.clone()).collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Registers a local subscriber. Returns true when it is the first one
    /// for its path.
    fn add_local(&mut self, key: u64, path: RemotePath, tx: mpsc::UnboundedSender<Value>) -> bool {
        let first = !self.has_path(&path);
        if let Some(cached) = self.snapshots.get(&path) {
            let _ = tx.send(cached.clone());
        }
        self.locals.insert(key, LocalSubscriber { path, tx });
        first
    }

    /// Removes a local subscriber. Returns its path when no other local
    /// subscriber still wants it.
    fn remove_local(&mut self, key: u64) -> Option<RemotePath> {
        let local = self.locals.remove(&key)?;
        if self.has_path(&local.path) {
            return None;
        }
        self.snapshots.remove(&local.path);
        Some(local.path)
    }

    /// Handles a command while no socket is open.
    fn handle_offline(&mut self, command: Command) {
        match command {
            Command::Request { reply, .. } => {
                let _ = reply.send(Err(RemoteError::NotConnected));
            }
            Command::Subscribe { key, path, tx } => {
                self.add_local(key, path, tx);
            }
            Command::Unsubscribe { key } => {
                self.remove_local(key);
            }
        }
    }

    async fn handle_online(&mut self, command: Command, sink: &mut WsSink) -> Result<(), String> {
        match command {
            Command::Request { id, frame, reply } => {
                self.pending.retain(|_, waiting| !waiting.is_closed());
                self.pending.insert(id, reply);
                send_frame(sink, frame).await
            }
            Command::Subscribe { key, path, tx } => {
                if self.add_local(key, path.clone(), tx) {
                    send_message(sink, &ClientMessage::subscribe(path)).await?;
                }
                Ok(())
            }
            Command::Unsubscribe { key } => match self.remove_local(key) {
                Some(path) => send_message(sink, &ClientMessage::unsubscribe(path)).await,
                None => Ok(()),
            },
        }
    }

    fn route(&mut self, text: &str) {
        let message = match ServerMessage::from_json(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("ignoring malformed frame from relay: {}", e);
                return;
            }
        };

        match message {
            ServerMessage::Ack { request_id } => {
                if let Some(reply) = self.pending.remove(&request_id) {
                    let _ = reply.send(Ok(()));
                }
            }
            ServerMessage::Error {
                request_id: Some(request_id),
                message,
            } => {
                if let Some(reply) = self.pending.remove(&request_id) {
                    let _ = reply.send(Err(RemoteError::Rejected(message)));
                }
            }
            ServerMessage::Error {
                request_id: None,
                message,
            } => {
                warn!("relay error: {}", message);
            }
            ServerMessage::Snapshot { path, value } => {
                if !self.has_path(&path) {
                    debug!("dropping snapshot for unwatched path {}", path);
                    return;
                }
                for local in self.locals.values().filter(|l| l.path == path) {
                    let _ = local.tx.send(value.clone());
                }
                self.snapshots.insert(path, value);
            }
            ServerMessage::Pong { id } => {
                debug!("pong {}", id);
            }
        }
    }

    fn fail_pending(&mut self) {
        for (_, reply) in self.pending.drain() {
            let _ = reply.send(Err(RemoteError::ConnectionClosed));
        }
    }

    /// Runs one connected session until the socket drops or shutdown.
    async fn serve(
        &mut self,
        ws: WsStream,
        commands: &mut mpsc::UnboundedReceiver<Command>,
        cancel: &CancellationToken,
    ) -> SessionEnd {
        let (mut sink, mut stream) = ws.split();

        for path in self.active_paths() {
            if let Err(e) = send_message(&mut sink, &ClientMessage::subscribe(path)).await {
                return SessionEnd::Disconnected(e);
            }
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = sink.close().await;
                    return SessionEnd::Shutdown;
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        let _ = sink.close().await;
                        return SessionEnd::Shutdown;
                    };
                    if let Err(e) = self.handle_online(command, &mut sink).await {
                        return SessionEnd::Disconnected(e);
                    }
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.route(&text),
                    Some(Ok(Message::Close(_))) | None => {
                        return SessionEnd::Disconnected("closed by relay".to_string());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return SessionEnd::Disconnected(e.to_string()),
                },
            }
        }
    }
}

async fn send_frame(sink: &mut WsSink, frame: String) -> Result<(), String> {
    sink.send(Message::Text(frame.into()))
        .await
        .map_err(|e| e.to_string())
}

async fn send_message(sink: &mut WsSink, message: &ClientMessage) -> Result<(), String> {
    let frame = message.to_json().map_err(|e| e.to_string())?;
    send_frame(sink, frame).await
}

async fn connect(config: &RemoteConfig) -> RemoteResult<WsStream> {
    let attempt = tokio_tungstenite::connect_async(config.url.as_str());
    match tokio::time::timeout(config.connect_timeout(), attempt).await {
        Ok(Ok((ws, _))) => Ok(ws),
        Ok(Err(e)) => Err(RemoteError::ConnectionFailed(e.to_string())),
        Err(_) => Err(RemoteError::ConnectionFailed("connect timed out".to_string())),
    }
}

/// Connection loop with exponential backoff.
///
/// Commands are serviced in every phase so callers never block on the link.
async fn run(
    config: RemoteConfig,
    mut commands: mpsc::UnboundedReceiver<Command>,
    link: watch::Sender<bool>,
    cancel: CancellationToken,
) {
    let mut router = Router::default();
    let mut delay_ms = config.initial_delay_ms;
    let mut attempt = 0u32;

    loop {
        attempt = attempt.saturating_add(1);
        let connecting = connect(&config);
        tokio::pin!(connecting);
        let result = loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                command = commands.recv() => match command {
                    Some(command) => router.handle_offline(command),
                    None => return,
                },
                result = &mut connecting => break result,
            }
        };

        match result {
            Ok(ws) => {
                info!("connected to {}", config.url);
                attempt = 0;
                delay_ms = config.initial_delay_ms;
                link.send_replace(true);

                let end = router.serve(ws, &mut commands, &cancel).await;
                link.send_replace(false);
                router.fail_pending();

                match end {
                    SessionEnd::Shutdown => return,
                    SessionEnd::Disconnected(reason) => {
                        warn!("disconnected from {}: {}", config.url, reason);
                    }
                }
            }
            Err(e) => {
                debug!("connect attempt {} to {} failed: {}", attempt, config.url, e);
            }
        }

        let backoff = tokio::time::sleep(Duration::from_millis(delay_ms));
        tokio::pin!(backoff);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                command = commands.recv() => match command {
                    Some(command) => router.handle_offline(command),
                    None => return,
                },
                _ = &mut backoff => break,
            }
        }
        delay_ms = std::cmp::min(
            delay_ms.saturating_mul(2),
            config.max_delay_secs.saturating_mul(1000),
        );
    }
}

#[cfg(test)]
#[path = "websocket_tests.rs"]
mod tests;
