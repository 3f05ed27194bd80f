// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tally-core: Shared library for the tally record sync engine
//!
//! This crate provides the record model, remote addressing, device identity
//! and wire protocol used by the sync engine, the relay server and the CLI.

pub mod clock;
pub mod collection;
pub mod device;
pub mod error;
pub mod jsonl;
pub mod op;
pub mod path;
pub mod protocol;
pub mod record;
pub mod temporal;
pub mod value;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::Collection;
pub use device::{get_or_create_device_id, DeviceId, DeviceIdentity};
pub use error::{Error, Result};
pub use op::{OpId, OpKind, SyncOperation};
pub use path::RemotePath;
pub use record::Record;
pub use value::FieldValue;
