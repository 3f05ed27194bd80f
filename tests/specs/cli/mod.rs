// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod common;
mod delete;
mod device;
mod errors;
mod init;
mod put;
mod status;
mod sync;
mod version;
mod watch;
