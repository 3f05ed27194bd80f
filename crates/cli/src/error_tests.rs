// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tally_sync::{RemoteError, SyncError};

#[test]
fn test_error_not_initialized_display() {
    let err = Error::NotInitialized;
    assert!(err.to_string().contains("not initialized"));
    assert!(err.to_string().contains("tally init"));
}

#[test]
fn test_error_already_initialized_display() {
    let err = Error::AlreadyInitialized("/path/to/.tally".to_string());
    assert!(err.to_string().contains("already initialized"));
    assert!(err.to_string().contains("/path/to/.tally"));
}

#[test]
fn test_error_invalid_field_has_hint() {
    let err = Error::InvalidField("vendor".to_string());
    let msg = err.to_string();
    assert!(msg.contains("'vendor'"));
    assert!(msg.contains("key=value"));
}

#[test]
fn test_sync_offline_maps_to_offline() {
    let err: Error = SyncError::Offline.into();
    assert!(matches!(err, Error::Offline));
    assert!(err.to_string().starts_with("offline"));
}

#[test]
fn test_sync_core_error_unwraps() {
    let core = tally_core::Error::UnknownCollection("invoices".to_string());
    let err: Error = SyncError::Core(core).into();
    assert!(matches!(err, Error::Core(_)));
    assert!(err.to_string().contains("unknown collection"));
}

#[test]
fn test_remote_error_is_sync_error() {
    let err: Error = SyncError::Remote(RemoteError::NotConnected).into();
    assert!(matches!(err, Error::Sync(_)));
    assert!(err.to_string().starts_with("sync error"));
}
