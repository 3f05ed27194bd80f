// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde_json::Value;
use tally_core::{Collection, Record};
use tokio::sync::mpsc;

use super::Session;
use crate::error::Result;

pub async fn run(state_dir: &Path, collection: Collection, once: bool, json: bool) -> Result<()> {
    let session = Session::open(state_dir, true).await?;
    session.settle().await;
    let monitor = session.link().map(|link| session.engine.start_monitor(link));

    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<Record>>();
    session
        .engine
        .watch(collection, move |records: &[Record]| {
            let _ = tx.send(records.to_vec());
        })
        .await?;

    let result = loop {
        tokio::select! {
            Some(records) = rx.recv() => {
                if let Err(e) = print_records(collection, &records, json) {
                    break Err(e);
                }
                if once {
                    break Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }
    };

    if let Some(monitor) = monitor {
        monitor.shutdown().await;
    }
    session.close().await;
    result
}

fn print_records(collection: Collection, records: &[Record], json: bool) -> Result<()> {
    if json {
        for record in records {
            println!("{}", serde_json::to_string(&record.to_wire())?);
        }
        return Ok(());
    }

    println!("{} ({})", collection, records.len());
    for record in records {
        println!("{}", format_record(record));
    }
    Ok(())
}

pub(crate) fn format_record(record: &Record) -> String {
    let mut line = format!("  {}", record.id);
    for (name, value) in &record.fields {
        let rendered = match value.to_json() {
            Value::String(s) => s,
            other => other.to_string(),
        };
        line.push_str(&format!("  {}={}", name, rendered));
    }
    line
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
