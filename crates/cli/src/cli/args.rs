// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.

use clap::Args;
use tally_core::Collection;

/// Addresses one record.
#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    /// Collection (clients, receipts, expenses, documents, employees)
    #[arg(value_parser = parse_collection)]
    pub collection: Collection,

    /// Record id
    #[arg(value_parser = non_empty_string)]
    pub id: String,
}

/// Connection arguments for commands that work offline.
#[derive(Args, Clone, Debug, Default)]
pub struct RemoteArgs {
    /// Skip connecting to the relay
    #[arg(long)]
    pub offline: bool,
}

pub(crate) fn parse_collection(s: &str) -> Result<Collection, String> {
    s.parse::<Collection>().map_err(|e| e.to_string())
}

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}
