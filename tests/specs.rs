// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specs for the `provtrack` binary.
//!
//! Each spec runs the real binary against an isolated state and config
//! directory. No spec needs a live control plane.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli.rs"]
mod cli;
