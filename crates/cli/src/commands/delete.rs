// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tally_core::{OpKind, Record};

use super::{print_queue_state, Session};
use crate::cli::{RecordArgs, RemoteArgs};
use crate::error::Result;

pub async fn run(state_dir: &Path, target: RecordArgs, remote: RemoteArgs) -> Result<()> {
    let record = Record::new(target.id.as_str());
    record.validate()?;

    let session = Session::open(state_dir, !remote.offline).await?;
    session
        .engine
        .record_change(OpKind::Delete, target.collection, record)?;
    println!("Queued delete {}/{}", target.collection, target.id);

    let status = session.settle().await;
    print_queue_state(&status);
    session.close().await;
    Ok(())
}
