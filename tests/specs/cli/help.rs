// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_with_usage_code() {
    cli().exits_with(3).stderr_has("Usage:");
}

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("submit")
        .stdout_has("watch")
        .stdout_has("status")
        .stdout_has("show")
        .stdout_has("forget");
}

#[test]
fn submit_help_mentions_detach() {
    cli().args(&["submit", "--help"]).passes().stdout_has("--detach");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn unknown_command_is_usage_error() {
    cli().args(&["launch"]).exits_with(3);
}
