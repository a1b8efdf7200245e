// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pf list`

use crate::prelude::*;

#[test]
fn lists_every_fixer() {
    let out = cli().args(&["list"]).passes();
    for name in [
        "spooler-reset",
        "queue-purge",
        "printer-resume",
        "sharing-firewall",
        "driver-reinstall",
        "print-path-repair",
    ] {
        assert!(out.stdout.contains(name), "missing {name}:\n{}", out.stdout);
    }
}

#[test]
fn shows_input_requirement() {
    cli().args(&["list", "--code", "ppd"]).passes().stdout_has("needs input: PPD driver source");
}

#[test]
fn code_lookup_ignores_case() {
    let out = cli().args(&["list", "--code", "SPOOLER", "-o", "json"]).passes();
    let names: Vec<String> = out
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["spooler-reset"]);
}

#[test]
fn unclaimed_code_says_so() {
    cli().args(&["list", "--code", "toner"]).passes().stdout_has("No fixer claims `toner`");
}
