// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Each connection owns its subscriptions. A forwarding task per subscribed
//! path feeds snapshots into the connection's outbound channel; the
//! connection loop writes them to the socket alongside request responses.
//! Subscriptions are dropped with the connection.

use std::collections::HashMap;
use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tally_core::protocol::{ClientMessage, ServerMessage};
use tally_core::RemotePath;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::state::RelayState;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: RelayState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Forwarding tasks for one connection, keyed by path.
#[derive(Default)]
pub(crate) struct Subscriptions {
    tasks: HashMap<RemotePath, JoinHandle<()>>,
}

impl Subscriptions {
    fn insert(&mut self, path: RemotePath, task: JoinHandle<()>) {
        if let Some(previous) = self.tasks.insert(path, task) {
            previous.abort();
        }
    }

    fn remove(&mut self, path: &RemotePath) -> bool {
        match self.tasks.remove(path) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: RelayState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();
    let mut subscriptions = Subscriptions::default();

    loop {
        tokio::select! {
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response =
                            handle_client_message(&text, &state, &mut subscriptions, &outbound_tx);
                        if let Some(response) = response {
                            let json = response.to_json()?;
                            ws_sink.send(Message::Text(json.into())).await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client {} disconnected", peer_addr);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        ws_sink.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error from {}: {}", peer_addr, e);
                        break;
                    }
                    None => {
                        info!("Client {} stream ended", peer_addr);
                        break;
                    }
                }
            }

            Some(snapshot) = outbound_rx.recv() => {
                let json = snapshot.to_json()?;
                if let Err(e) = ws_sink.send(Message::Text(json.into())).await {
                    warn!("Failed to send snapshot to {}: {}", peer_addr, e);
                    break;
                }
            }
        }
    }

    debug!(
        "Dropping {} subscription(s) for {}",
        subscriptions.len(),
        peer_addr
    );
    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and return an optional direct response.
///
/// Snapshots for subscriptions are delivered through `outbound`.
pub(crate) fn handle_client_message(
    text: &str,
    state: &RelayState,
    subscriptions: &mut Subscriptions,
    outbound: &mpsc::UnboundedSender<ServerMessage>,
) -> Option<ServerMessage> {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => return Some(ServerMessage::error(None, format!("invalid message: {e}"))),
    };
    debug!("Received message: {:?}", msg);

    match msg {
        ClientMessage::Set {
            request_id,
            path,
            value,
        } => Some(match state.set(&path, value) {
            Ok(()) => ServerMessage::ack(request_id),
            Err(e) => ServerMessage::error(Some(request_id), e.to_string()),
        }),

        ClientMessage::Remove { request_id, path } => Some(match state.remove(&path) {
            Ok(()) => ServerMessage::ack(request_id),
            Err(e) => ServerMessage::error(Some(request_id), e.to_string()),
        }),

        ClientMessage::Subscribe { path } => {
            let mut subscription = match state.watch(&path) {
                Ok(subscription) => subscription,
                Err(e) => return Some(ServerMessage::error(None, e.to_string())),
            };
            let outbound = outbound.clone();
            let snapshot_path = path.clone();
            let task = tokio::spawn(async move {
                while let Some(value) = subscription.next().await {
                    let message = ServerMessage::snapshot(snapshot_path.clone(), value);
                    if outbound.send(message).is_err() {
                        break;
                    }
                }
            });
            debug!("Subscribed to {}", path);
            subscriptions.insert(path, task);
            None
        }

        ClientMessage::Unsubscribe { path } => {
            if subscriptions.remove(&path) {
                debug!("Unsubscribed from {}", path);
            }
            None
        }

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            Some(ServerMessage::pong(id))
        }
    }
}
