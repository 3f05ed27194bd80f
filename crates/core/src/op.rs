// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued mutations awaiting transmission.
//!
//! A `SyncOperation` is created when a local mutation commits and is removed
//! only after the remote store confirms it. Operations are never edited in
//! place: a failed attempt re-queues the same value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::collection::Collection;
use crate::device::DeviceId;
use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::record::Record;

/// Unique identifier for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpId(uuid::Uuid);

impl OpId {
    /// Generates a new random operation id.
    pub fn generate() -> Self {
        OpId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of mutation an operation carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::Create => "create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        }
    }

    /// Returns true for kinds that write the full record.
    pub fn is_upsert(&self) -> bool {
        matches!(self, OpKind::Create | OpKind::Update)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OpKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OpKind::Create),
            "update" => Ok(OpKind::Update),
            "delete" => Ok(OpKind::Delete),
            _ => Err(Error::InvalidOpKind(s.to_string())),
        }
    }
}

/// A pending mutation of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOperation {
    pub id: OpId,
    pub kind: OpKind,
    pub collection: Collection,
    /// Snapshot of the record at enqueue time. For deletes only the id is
    /// used.
    pub payload: Record,
    pub created_at: DateTime<Utc>,
    pub origin_device: DeviceId,
}

impl SyncOperation {
    /// Creates a new operation with a fresh id.
    pub fn new(
        kind: OpKind,
        collection: Collection,
        payload: Record,
        origin_device: DeviceId,
        created_at: DateTime<Utc>,
    ) -> Self {
        SyncOperation {
            id: OpId::generate(),
            kind,
            collection,
            payload,
            created_at,
            origin_device,
        }
    }

    /// Returns the id of the affected record.
    pub fn record_id(&self) -> &str {
        &self.payload.id
    }

    /// Returns the remote path this operation writes or removes.
    pub fn remote_path(&self) -> Result<RemotePath> {
        RemotePath::record(self.collection, &self.payload.id)
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
