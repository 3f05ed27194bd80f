// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_STATE_DIR;

pub use args::{RecordArgs, RemoteArgs};

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first record sync for small business books")]
#[command(
    long_about = "Offline-first record sync for small business books.\n\n\
    Changes are queued locally and pushed to the relay whenever it is reachable. \
    Records written by other devices are merged into the local view."
)]
pub struct Cli {
    /// State directory holding config, device id and queue
    #[arg(long, global = true, value_name = "path", default_value = DEFAULT_STATE_DIR)]
    pub state_dir: PathBuf,

    /// Log debug output to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a state directory
    Init {
        /// Relay URL (ws:// or wss://)
        #[arg(long, conflicts_with = "local")]
        remote: Option<String>,

        /// Local-only mode: never connect, keep every change queued
        #[arg(long)]
        local: bool,
    },

    /// Create or update a record
    #[command(after_help = "\
Examples:
  tally put receipts R1 -f date=2024-03-01 -f amount=12.5 -f vendor=\"Corner Shop\"
  tally put clients C7 -f name=Acme --update")]
    Put {
        #[command(flatten)]
        record: RecordArgs,

        /// Field as key=value; values that parse as JSON keep their type
        #[arg(short, long = "field", value_name = "key=value")]
        fields: Vec<String>,

        /// Queue an update instead of a create
        #[arg(long)]
        update: bool,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Delete a record
    Delete {
        #[command(flatten)]
        record: RecordArgs,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Drain the queue and write this device's heartbeat
    Sync,

    /// Show sync status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Print a collection every time it changes
    Watch {
        /// Collection to watch
        #[arg(value_parser = args::parse_collection)]
        collection: tally_core::Collection,

        /// Exit after the first update
        #[arg(long)]
        once: bool,

        /// Output records as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print this installation's device id
    Device,
}
