// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Path-style addressing into the hierarchical remote store.
//!
//! | Purpose                | Path                                |
//! |------------------------|-------------------------------------|
//! | One record             | `{collection}/{recordId}`           |
//! | Whole collection       | `{collection}`                      |
//! | Device heartbeat       | `sync_metadata/{deviceId}/lastSync` |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::collection::Collection;
use crate::device::DeviceId;
use crate::error::{Error, Result};

/// Root node holding per-device sync metadata.
pub const METADATA_ROOT: &str = "sync_metadata";

/// Leaf written by a full sync.
pub const HEARTBEAT_LEAF: &str = "lastSync";

/// A validated, `/`-separated path into the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemotePath(String);

impl RemotePath {
    /// Parses a path, ignoring leading and trailing slashes.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidPath(s.to_string()));
        }
        for segment in trimmed.split('/') {
            validate_segment(segment)?;
        }
        Ok(RemotePath(trimmed.to_string()))
    }

    /// Path of a whole collection.
    pub fn collection(collection: Collection) -> Self {
        RemotePath(collection.as_str().to_string())
    }

    /// Path of one record within a collection.
    pub fn record(collection: Collection, id: &str) -> Result<Self> {
        validate_segment(id)?;
        Ok(RemotePath(format!("{}/{}", collection.as_str(), id)))
    }

    /// Path of the heartbeat written by a device's full sync.
    pub fn heartbeat(device: &DeviceId) -> Result<Self> {
        validate_segment(device.as_str())?;
        Ok(RemotePath(format!("{METADATA_ROOT}/{}/{HEARTBEAT_LEAF}", device.as_str())))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Returns true if `other` is this path or lies below it.
    pub fn contains(&self, other: &RemotePath) -> bool {
        other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'/')
    }

    /// Returns true if a write at one path can change the value at the other.
    pub fn overlaps(&self, other: &RemotePath) -> bool {
        self.contains(other) || other.contains(self)
    }
}

/// Validates a single path segment (a collection name, record id or device id).
pub fn validate_segment(segment: &str) -> Result<()> {
    let invalid = segment.is_empty()
        || segment
            .chars()
            .any(|c| matches!(c, '/' | '.' | '#' | '$' | '[' | ']') || c.is_control());
    if invalid {
        return Err(Error::InvalidPath(segment.to_string()));
    }
    Ok(())
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RemotePath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        RemotePath::parse(&value)
    }
}

impl From<RemotePath> for String {
    fn from(path: RemotePath) -> Self {
        path.0
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
