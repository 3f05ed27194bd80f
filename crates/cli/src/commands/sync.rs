// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tally_core::temporal::format_timestamp;

use super::Session;
use crate::error::Result;

pub async fn run(state_dir: &Path) -> Result<()> {
    let session = Session::open(state_dir, true).await?;
    // perform_full_sync runs its own drain.
    session
        .engine
        .processor()
        .connectivity()
        .set_online(session.is_connected());

    let result = session.engine.perform_full_sync().await;
    let status = session.engine.status();
    session.close().await;
    let report = result?;

    match report.drain.report() {
        Some(pass) => println!(
            "Sent {}, failed {}, deferred {}, dead-lettered {}",
            pass.sent, pass.failed, pass.deferred, pass.dead_lettered
        ),
        None => println!("Nothing to send"),
    }
    if status.queue_length > 0 {
        println!("{} change(s) still pending", status.queue_length);
    }
    println!("Synced at {}", format_timestamp(&report.synced_at));
    Ok(())
}
