// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and version output.

use crate::prelude::*;

#[test]
fn help_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:").stdout_has("run").stdout_has("list");
}

#[test]
fn run_help_lists_driver_sources() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--input-file")
        .stdout_has("--input-share")
        .stdout_has("--input-auto");
}

#[test]
fn version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.2");
}

#[test]
fn no_subcommand_is_a_usage_error() {
    cli().exits(2).stderr_has("Usage:");
}
