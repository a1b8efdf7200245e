// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pf run` against fake CUPS tools.

use crate::prelude::*;

fn cups_tools(sandbox: &Sandbox) {
    sandbox
        .fake("cupsenable", "exit 0")
        .fake("cupsaccept", "exit 0")
        .fake("cancel", "exit 0")
        .fake("lpstat", "exit 0");
}

#[test]
fn resume_succeeds() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);

    sandbox
        .pf()
        .args(&["run", "printer-resume", "--printer", "lab"])
        .passes()
        .stdout_has("Starting printer-resume")
        .stdout_has("[OK] lab enabled")
        .stdout_has("[OK] lab accepting jobs")
        .stdout_has("[OK] Printer resumed")
        .stdout_has("run log: ");
}

#[test]
fn run_writes_audit_trail() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);
    sandbox.pf().args(&["run", "printer-resume", "-p", "lab"]).passes();

    let logs = sandbox.run_logs();
    assert_eq!(logs.len(), 1);
    // Drop the timestamps; the rest of each line is stable.
    let lines: Vec<&str> =
        logs[0].lines().map(|l| l.split_once(' ').map(|(_, rest)| rest).unwrap_or(l)).collect();
    similar_asserts::assert_eq!(
        lines,
        vec![
            "[run] printer-resume on local",
            "[info] Starting printer-resume: Re-enable a paused printer and let it accept jobs again",
            "[success] [OK] lab enabled",
            "[success] [OK] lab accepting jobs",
            "[success] Printer resumed",
            "[verdict] success: Printer resumed",
        ]
    );
}

#[test]
fn failed_step_exits_one() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);
    sandbox.fake("cupsenable", "echo 'cupsenable: Unknown printer' >&2; exit 1");

    sandbox
        .pf()
        .args(&["run", "printer-resume", "-p", "ghost"])
        .exits(1)
        .stdout_has("[ERROR] Step printer-resume/enable failed: `cupsenable` failed: exit code 1")
        .stdout_has("[ERROR] Printer could not be enabled");
}

#[test]
fn warning_exits_two() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);

    sandbox
        .pf()
        .args(&["run", "printer-resume"])
        .exits(2)
        .stdout_has("No printer selected, nothing to resume")
        .stdout_lacks("[OK]");
}

#[test]
fn missing_input_runs_nothing() {
    let sandbox = Sandbox::new();
    sandbox.fake("lpadmin", "touch \"$0.called\"");

    sandbox
        .pf()
        .args(&["run", "driver-reinstall", "-p", "lab"])
        .exits(2)
        .stdout_has("missing required input: PPD driver source");
    assert!(!sandbox.path().join("bin/lpadmin.called").exists());
}

#[test]
fn json_report_carries_verdict_and_steps() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);

    let out = sandbox.pf().args(&["run", "queue-purge", "-p", "lab", "-o", "json"]).passes();
    let report = out.json();
    assert_eq!(report["fixer"], "queue-purge");
    assert_eq!(report["target"], "local");
    assert_eq!(report["status"], "success");
    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps[0]["level"], "info");
    assert!(steps.iter().any(|s| s["message"] == "[OK] No jobs left in the queue"));
}

#[test]
fn symptom_picks_the_fixer() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);

    sandbox
        .pf()
        .args(&["run", "--symptom", "printer is PAUSED", "-p", "lab"])
        .passes()
        .stdout_has("Starting printer-resume");
}

#[test]
fn unknown_fixer_is_an_error() {
    cli().args(&["run", "defrag"]).exits(1).stderr_has("unknown fixer `defrag`");
}

#[test]
fn one_driver_source_at_a_time() {
    cli()
        .args(&["run", "driver-reinstall", "--input-auto", "--input-file", "/tmp/x.ppd"])
        .exits(2)
        .stderr_has("cannot be used with");
}

#[test]
fn remote_host_goes_through_ssh() {
    let sandbox = Sandbox::new();
    cups_tools(&sandbox);
    let args_file = sandbox.path().join("ssh-args");
    sandbox.fake("fake-ssh", &format!("echo \"$@\" > '{}'\nexec /bin/sh -s", args_file.display()));

    sandbox
        .pf()
        .env("PF_SSH_PROGRAM", sandbox.path().join("bin/fake-ssh"))
        .args(&["run", "printer-resume", "-p", "lab", "--host", "print01.lab", "--user", "admin"])
        .passes()
        .stdout_has("[OK] lab enabled");

    let args = std::fs::read_to_string(args_file).unwrap();
    assert!(args.contains("BatchMode=yes"));
    assert!(args.contains("admin@print01.lab sh -s"));
}
