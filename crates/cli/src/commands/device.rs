// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use tally_core::DeviceIdentity;

use crate::error::Result;

pub fn run(state_dir: &Path) -> Result<()> {
    let identity = DeviceIdentity::load_or_create(state_dir);
    println!("{}", identity.id);
    if !identity.persisted {
        eprintln!("warning: device id could not be saved and will change on the next run");
    }
    Ok(())
}
