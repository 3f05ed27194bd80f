// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-installation device identity.
//!
//! Every write is tagged with the id of the device that authored it so the
//! realtime subscriber can drop its own writes when the remote store echoes
//! them back. The id is generated once and kept in `<state_dir>/device_id`.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Filename of the persisted device id within the state directory.
pub const DEVICE_ID_FILE: &str = "device_id";

/// Opaque identifier of one installation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        DeviceId(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(value: &str) -> Self {
        DeviceId(value.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(value: String) -> Self {
        DeviceId(value)
    }
}

/// A device id together with whether it survived to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub id: DeviceId,
    /// False when storage failed and the id only lives for this run.
    pub persisted: bool,
}

impl DeviceIdentity {
    /// Loads the persisted device id, creating and persisting one on first use.
    ///
    /// Storage failures are not fatal: an ephemeral id is returned instead.
    /// Writes tagged with an ephemeral id are not recognized as our own after
    /// a restart, so echo suppression only holds for the current session.
    pub fn load_or_create(state_dir: &Path) -> Self {
        let path = state_dir.join(DEVICE_ID_FILE);

        match read_device_id(&path) {
            Ok(Some(id)) => return DeviceIdentity { id, persisted: true },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read device id, using ephemeral id");
                return DeviceIdentity { id: DeviceId::generate(), persisted: false };
            }
        }

        let id = DeviceId::generate();
        match write_device_id(state_dir, &path, &id) {
            Ok(()) => {
                tracing::info!(device_id = %id, "created device id");
                DeviceIdentity { id, persisted: true }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot persist device id, using ephemeral id");
                DeviceIdentity { id, persisted: false }
            }
        }
    }
}

/// Returns the device id for this installation, creating it on first call.
pub fn get_or_create_device_id(state_dir: &Path) -> DeviceId {
    DeviceIdentity::load_or_create(state_dir).id
}

/// Returns None if the file doesn't exist, holds only whitespace or is not
/// valid UTF-8.
fn read_device_id(path: &Path) -> std::io::Result<Option<DeviceId>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let id = content.trim();
            if id.is_empty() {
                Ok(None)
            } else {
                Ok(Some(DeviceId::from(id)))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            tracing::warn!(path = %path.display(), "device id file is not valid UTF-8, regenerating");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn write_device_id(state_dir: &Path, path: &Path, id: &DeviceId) -> std::io::Result<()> {
    fs::create_dir_all(state_dir)?;
    let mut file = File::create(path)?;
    write!(file, "{}", id)?;
    file.sync_all()
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
