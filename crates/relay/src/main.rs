// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tally-relay: WebSocket relay hosting the shared record tree.
//!
//! Clients write and remove records by path and subscribe to collections;
//! every subscriber receives the full collection snapshot after each change.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// tally-relay: shared record store for tally devices
#[derive(Parser, Debug)]
#[command(name = "tally-relay")]
#[command(about = "WebSocket relay hosting the shared tally record tree")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:7890")]
    bind: SocketAddr,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting tally-relay");
    info!("  Bind address: {}", args.bind);

    let state = state::RelayState::new();
    server::run(args.bind, state).await?;

    Ok(())
}
