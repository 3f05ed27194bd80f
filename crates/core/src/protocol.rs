// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between the sync engine and the relay.
//!
//! The protocol is simple:
//! - Client writes or removes values at paths and (un)subscribes to paths
//! - Relay acknowledges each write and pushes full snapshots of every
//!   subscribed path whenever something at, above or below it changes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::RemotePath;

/// Messages sent from client to relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Replace the value at a path.
    Set {
        /// Client-chosen ID echoed in the Ack or Error.
        request_id: u64,
        path: RemotePath,
        value: Value,
    },

    /// Remove the value at a path and everything below it.
    Remove { request_id: u64, path: RemotePath },

    /// Start receiving snapshots of a path.
    ///
    /// The relay answers with the current snapshot immediately.
    Subscribe { path: RemotePath },

    /// Stop receiving snapshots of a path.
    Unsubscribe { path: RemotePath },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from relay to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A Set or Remove was applied.
    Ack { request_id: u64 },

    /// Full current value of a subscribed path (`null` when absent).
    Snapshot { path: RemotePath, value: Value },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },

    /// Error message.
    Error {
        /// Set when the error answers a specific request.
        request_id: Option<u64>,
        /// Human-readable error description.
        message: String,
    },
}

impl ClientMessage {
    /// Creates a Set message.
    pub fn set(request_id: u64, path: RemotePath, value: Value) -> Self {
        ClientMessage::Set { request_id, path, value }
    }

    /// Creates a Remove message.
    pub fn remove(request_id: u64, path: RemotePath) -> Self {
        ClientMessage::Remove { request_id, path }
    }

    /// Creates a Subscribe message.
    pub fn subscribe(path: RemotePath) -> Self {
        ClientMessage::Subscribe { path }
    }

    /// Creates an Unsubscribe message.
    pub fn unsubscribe(path: RemotePath) -> Self {
        ClientMessage::Unsubscribe { path }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Ack message.
    pub fn ack(request_id: u64) -> Self {
        ServerMessage::Ack { request_id }
    }

    /// Creates a Snapshot message.
    pub fn snapshot(path: RemotePath, value: Value) -> Self {
        ServerMessage::Snapshot { path, value }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Creates an Error message.
    pub fn error(request_id: Option<u64>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            request_id,
            message: message.into(),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
