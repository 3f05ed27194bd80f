// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tally_core::DeviceIdentity;
use tally_sync::RemoteConfig;

use crate::config::init_state_dir;
use crate::error::Result;

pub fn run(state_dir: &Path, remote: Option<String>, local: bool) -> Result<()> {
    let url = match (remote, local) {
        (_, true) => None,
        (Some(url), false) => Some(url),
        (None, false) => Some(RemoteConfig::default().url),
    };

    let state_dir = init_state_dir(state_dir, url.as_deref())?;
    let identity = DeviceIdentity::load_or_create(&state_dir);

    println!("Initialized tally at {}", state_dir.display());
    match url {
        Some(url) => println!("Remote: {}", url),
        None => println!("Remote: none (local-only)"),
    }
    println!("Device: {}", identity.id);

    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
