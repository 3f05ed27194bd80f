// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `tally` binary.
//!
//! The specs live under `cli/` and are compiled as the `specs` test target
//! of the `tally` package so `cargo_bin("tally")` resolves.
