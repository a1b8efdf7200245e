// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use pf_core::Backend;

use super::*;

fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

#[yare::parameterized(
    clean_exit = { 0, "", "" },
    blank_stderr = { 0, "", "\n  \n" },
)]
fn success_outcomes(code: i32, stdout: &str, stderr: &str) {
    assert!(outcome_from_output(&output(code, stdout, stderr)).success);
}

#[yare::parameterized(
    exit_only = { 2, "", "exit code 2" },
    exit_and_stderr = { 1, "lpadmin: Unable to copy PPD\n", "exit code 1: lpadmin: Unable to copy PPD" },
    stderr_only = { 0, "warning one\nwarning two\n", "warning one; warning two" },
)]
fn failure_outcomes(code: i32, stderr: &str, expected: &str) {
    let outcome = outcome_from_output(&output(code, "kept\n", stderr));
    assert!(!outcome.success);
    assert_eq!(outcome.output, vec!["kept"]);
    assert_eq!(outcome.error.as_deref(), Some(expected));
}

#[test]
fn stdin_script_wraps_body_in_a_group() {
    assert_eq!(stdin_script("echo a"), "{ :\necho a\n} </dev/null\n");
    assert_eq!(stdin_script("echo a\n"), "{ :\necho a\n} </dev/null\n");
    assert_eq!(stdin_script(""), "{ :\n\n} </dev/null\n");
}

#[test]
fn signal_death_is_described() {
    let killed = Output { status: ExitStatus::from_raw(9), stdout: Vec::new(), stderr: Vec::new() };
    assert_eq!(outcome_from_output(&killed).error.as_deref(), Some("terminated by signal"));
}

#[test]
fn subprocess_errors_map_to_contract() {
    let cancelled = Err(SubprocessError::Cancelled { label: "x".into() });
    assert_eq!(outcome_from_subprocess(cancelled), Err(Cancelled));

    let timed_out =
        Err(SubprocessError::TimedOut { label: "script `x`".into(), timeout: Duration::from_secs(2) });
    let outcome = outcome_from_subprocess(timed_out).unwrap();
    assert!(!outcome.success);
    assert!(outcome.output.is_empty());
    assert_eq!(outcome.error.as_deref(), Some("script `x` timed out after 2s"));
}

// ---------------------------------------------------------------------------
// FakeRunner
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fake_replays_queue_then_repeats_last() {
    let fake = FakeRunner::new();
    fake.succeed("probe", &["first"]).fail("probe", "second");
    let script = Script::embedded("probe", "true");
    let cancel = CancellationToken::new();

    let a = fake.run(&script, &Target::Local, &cancel).await.unwrap();
    let b = fake.run(&script, &Target::Local, &cancel).await.unwrap();
    let c = fake.run(&script, &Target::Local, &cancel).await.unwrap();

    assert_eq!(a.output, vec!["first"]);
    assert_eq!(b.error.as_deref(), Some("second"));
    assert_eq!(c, b);
    assert_eq!(fake.call_names(), vec!["probe", "probe", "probe"]);
}

#[tokio::test]
async fn fake_records_call_details() {
    let fake = FakeRunner::new();
    let script = Script::external("purge", "cancel -a \"$PRINTER\"").var("PRINTER", "lab");
    fake.run(&script, &Target::remote("print01"), &CancellationToken::new()).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].backend, Backend::External);
    assert_eq!(calls[0].var("PRINTER"), Some("lab"));
    assert_eq!(calls[0].target, Target::remote("print01"));
}

#[tokio::test]
async fn fake_cancel_on_triggers_token() {
    let fake = FakeRunner::new();
    let cancel = CancellationToken::new();
    fake.cancel_on("stop", cancel.clone());

    let ok = fake.run(&Script::embedded("other", "true"), &Target::Local, &cancel).await;
    assert!(ok.is_ok());
    let stopped = fake.run(&Script::embedded("stop", "true"), &Target::Local, &cancel).await;
    assert_eq!(stopped, Err(Cancelled));
    assert!(cancel.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn fake_delay_is_cancellable() {
    let fake = FakeRunner::new();
    fake.set_delay(Duration::from_secs(3600));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });
    let result = fake.run(&Script::embedded("slow", "true"), &Target::Local, &cancel).await;
    assert_eq!(result, Err(Cancelled));
}
