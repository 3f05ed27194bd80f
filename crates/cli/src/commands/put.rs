// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde_json::Value;
use tally_core::{FieldValue, OpKind, Record};

use super::{print_queue_state, Session};
use crate::cli::{RecordArgs, RemoteArgs};
use crate::error::{Error, Result};

pub async fn run(
    state_dir: &Path,
    target: RecordArgs,
    fields: Vec<String>,
    update: bool,
    remote: RemoteArgs,
) -> Result<()> {
    let record = build_record(&target.id, &fields)?;
    record.validate()?;

    let session = Session::open(state_dir, !remote.offline).await?;
    let kind = if update { OpKind::Update } else { OpKind::Create };
    session.engine.record_change(kind, target.collection, record)?;
    println!("Queued {} {}/{}", kind, target.collection, target.id);

    let status = session.settle().await;
    print_queue_state(&status);
    session.close().await;
    Ok(())
}

pub(crate) fn build_record(id: &str, fields: &[String]) -> Result<Record> {
    let mut record = Record::new(id);
    for field in fields {
        let (name, value) = parse_field(field)?;
        record.set(&name, value);
    }
    Ok(record)
}

/// Parses `key=value`. Values that parse as JSON keep their JSON type,
/// anything else is taken as a string.
pub(crate) fn parse_field(field: &str) -> Result<(String, FieldValue)> {
    let Some((name, raw)) = field.split_once('=') else {
        return Err(Error::InvalidField(field.to_string()));
    };
    let name = name.trim();
    if name.is_empty() || name == "id" {
        return Err(Error::InvalidField(field.to_string()));
    }

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => FieldValue::from_json(value),
        Err(_) => FieldValue::from(raw),
    };
    Ok((name.to_string(), value))
}

#[cfg(test)]
#[path = "put_tests.rs"]
mod tests;
