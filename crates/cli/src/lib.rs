// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tally_cli - command-line host for the tally sync engine.
//!
//! Every command works on a state directory (default `.tally/`) holding
//! `config.toml`, the device id and the operation queue. Mutations are
//! queued first and pushed to the relay when it is reachable, so every
//! command except `sync` also works offline.
//!
//! ```rust,ignore
//! use clap::Parser;
//! use tally_cli::Cli;
//!
//! let cli = Cli::parse_from(["tally", "put", "receipts", "R1", "-f", "amount=12.5"]);
//! tally_cli::run(cli).await?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod error;

pub use cli::{Cli, Command, RecordArgs, RemoteArgs};
pub use config::Config;
pub use error::{Error, Result};

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(cli: Cli) -> Result<()> {
    let state_dir = cli.state_dir;
    match cli.command {
        Command::Init { remote, local } => commands::init::run(&state_dir, remote, local),
        Command::Put {
            record,
            fields,
            update,
            remote,
        } => commands::put::run(&state_dir, record, fields, update, remote).await,
        Command::Delete { record, remote } => {
            commands::delete::run(&state_dir, record, remote).await
        }
        Command::Sync => commands::sync::run(&state_dir).await,
        Command::Status { json, remote } => commands::status::run(&state_dir, json, remote).await,
        Command::Watch {
            collection,
            once,
            json,
        } => commands::watch::run(&state_dir, collection, once, json).await,
        Command::Device => commands::device::run(&state_dir),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
