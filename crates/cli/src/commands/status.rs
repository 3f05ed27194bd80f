// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tally_core::temporal::format_timestamp;
use tally_sync::{SyncEngine, SyncStatus};

use super::Session;
use crate::cli::RemoteArgs;
use crate::error::Result;

pub async fn run(state_dir: &Path, json: bool, remote: RemoteArgs) -> Result<()> {
    let session = Session::open(state_dir, !remote.offline).await?;
    let status = observe(&session.engine, session.is_connected());
    session.close().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print!("{}", format_status(&status));
    }
    Ok(())
}

/// Reports the engine's status with the connection as last seen, leaving
/// the queue untouched.
pub(crate) fn observe(engine: &SyncEngine, connected: bool) -> SyncStatus {
    engine.processor().connectivity().set_online(connected);
    engine.status()
}

pub(crate) fn format_status(status: &SyncStatus) -> String {
    let last_sync = status
        .last_full_sync
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| "never".to_string());

    let mut out = String::new();
    out.push_str(&format!("Device:       {}\n", status.device_id));
    out.push_str(&format!(
        "Connection:   {}\n",
        if status.online { "online" } else { "offline" }
    ));
    out.push_str(&format!("Queued:       {}\n", status.queue_length));
    out.push_str(&format!("Last sync:    {}\n", last_sync));
    if status.dead_letters > 0 {
        out.push_str(&format!(
            "Dead letters: {} (see dead_letter.jsonl)\n",
            status.dead_letters
        ));
    }
    if status.retry_budget_exhausted {
        out.push_str("warning: retry budget exhausted, run 'tally sync' to retry now\n");
    }
    if status.queue_resets > 0 {
        out.push_str("warning: queue file was corrupt and has been reset (kept as .corrupt)\n");
    }
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
