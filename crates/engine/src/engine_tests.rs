// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pf_adapters::FakeRunner;
use pf_core::{Cancelled, FakeClock, FixInput, FixerDescriptor, PrinterContext, Script, Target};

use super::*;
use crate::fixers::{DriverReinstall, PrintPathRepair, SpoolerReset};
use crate::sink::NullSink;

#[derive(Default)]
struct Recorder {
    entries: Mutex<Vec<LogEntry>>,
}

impl Recorder {
    fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }
}

impl ProgressSink for Recorder {
    fn report(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}

fn engine(runner: &FakeRunner) -> Engine<FakeRunner, FakeClock> {
    Engine::new(runner.clone(), FakeClock::new())
}

static PANICKY: FixerDescriptor =
    FixerDescriptor { name: "panicky", description: "Panics after one step", codes: &["test"] };

/// Runs one step, then panics.
struct Panicky;

#[async_trait]
impl Fixer for Panicky {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &PANICKY
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        ctx.exec(Script::embedded("panicky/first", "true")).await?;
        panic!("lost track of the queue");
    }
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn local_service_bounce_succeeds() {
    let runner = FakeRunner::new();
    runner.succeed("spooler-reset/stop", &["[OK] CUPS scheduler stopped"]);
    runner.succeed("spooler-reset/clear", &["[OK] Removed 3 spool file(s)"]);
    runner.succeed("spooler-reset/start", &["[OK] CUPS scheduler started"]);

    let verdict =
        engine(&runner).apply(&SpoolerReset, &FixRequest::new(), &NullSink, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Success);
    assert!(verdict.steps.len() >= 3);
    assert_eq!(verdict.steps[0].level, Level::Info);
    assert_eq!(verdict.steps[0].message, "Starting spooler-reset: Stop the CUPS scheduler, clear stale spool files and start it again");
    assert!(verdict.steps[1..].iter().all(|e| e.level == Level::Success));
    assert_eq!(runner.call_names().len(), 3);
    assert!(!verdict.cancelled);
}

#[tokio::test]
async fn missing_input_is_a_warning_with_no_commands() {
    let runner = FakeRunner::new();
    let request = FixRequest::new().printer(PrinterContext::new("lab"));
    let verdict =
        engine(&runner).apply(&DriverReinstall, &request, &NullSink, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Warning);
    assert_eq!(
        verdict.summary,
        "driver-reinstall not run: missing required input: PPD driver source (file, network share or automatic)"
    );
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn blank_input_counts_as_missing() {
    let runner = FakeRunner::new();
    let request = FixRequest::new()
        .printer(PrinterContext::new("lab"))
        .input(FixInput::NetworkShare("  ".into()));
    let verdict =
        engine(&runner).apply(&DriverReinstall, &request, &NullSink, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Warning);
    assert!(verdict.summary.ends_with("missing required input: network share is empty"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn composite_tolerates_failed_sub_fixer() {
    let runner = FakeRunner::new();
    runner.fail("queue-purge/purge", "exit code 1");
    let request = FixRequest::new().printer(PrinterContext::new("lab"));
    let verdict =
        engine(&runner).apply(&PrintPathRepair, &request, &NullSink, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Warning);
    assert!(verdict.count(Level::Error) >= 1);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn sink_sees_entries_in_step_order() {
    let runner = FakeRunner::new();
    runner.set_delay(Duration::from_millis(30));
    runner.succeed("spooler-reset/stop", &["[OK] stopped"]);
    runner.succeed("spooler-reset/clear", &["removing c00001", "[OK] cleared"]);
    runner.succeed("spooler-reset/start", &["[OK] started"]);

    let recorder = Recorder::default();
    let verdict =
        engine(&runner).apply(&SpoolerReset, &FixRequest::new(), &recorder, &CancellationToken::new()).await;

    let seen = recorder.messages();
    let trail: Vec<String> = verdict.steps.iter().map(|e| e.message.clone()).collect();
    assert_eq!(seen, trail);
    assert_eq!(
        seen[1..5],
        ["[OK] stopped", "removing c00001", "[OK] cleared", "[OK] started"]
    );
}

// ---------------------------------------------------------------------------
// Verdict totality
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pre_cancelled_issues_no_commands() {
    let runner = FakeRunner::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let verdict = engine(&runner).apply(&SpoolerReset, &FixRequest::new(), &NullSink, &cancel).await;

    assert!(verdict.cancelled);
    assert_eq!(verdict.status, FixStatus::Warning);
    assert_eq!(verdict.summary, "spooler-reset cancelled before any step ran");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn cancel_mid_run_keeps_partial_trail() {
    let runner = FakeRunner::new();
    let cancel = CancellationToken::new();
    runner.succeed("spooler-reset/stop", &["[OK] CUPS scheduler stopped"]);
    runner.cancel_on("spooler-reset/clear", cancel.clone());

    let verdict = engine(&runner).apply(&SpoolerReset, &FixRequest::new(), &NullSink, &cancel).await;

    assert!(verdict.cancelled);
    assert_eq!(verdict.status, FixStatus::Warning);
    assert_eq!(runner.call_names(), vec!["spooler-reset/stop", "spooler-reset/clear"]);
    assert!(verdict.steps.iter().any(|e| e.message == "[OK] CUPS scheduler stopped"));
    assert_eq!(verdict.steps.last().map(|e| e.level), Some(Level::Warning));
}

#[tokio::test]
async fn panic_becomes_failed_verdict() {
    let runner = FakeRunner::new();
    let verdict = engine(&runner).apply(&Panicky, &FixRequest::new(), &NullSink, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Failed);
    assert!(verdict
        .steps
        .iter()
        .any(|e| e.level == Level::Error && e.message == "Internal error in panicky: lost track of the queue"));
    assert_eq!(runner.call_names(), vec!["panicky/first"]);
}

#[tokio::test]
async fn delegated_panic_keeps_trail_and_feed_in_step() {
    let runner = FakeRunner::new();
    runner.panic_on("spooler-reset/start");
    let recorder = Recorder::default();
    let verdict =
        engine(&runner).apply(&PrintPathRepair, &FixRequest::new(), &recorder, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Failed);
    assert_eq!(*recorder.entries.lock(), verdict.steps);
    assert!(verdict.steps.iter().any(|e| e.message == "Running spooler-reset"));
}

#[tokio::test]
async fn runner_panic_becomes_failed_verdict() {
    let runner = FakeRunner::new();
    runner.panic_on("spooler-reset/start");
    let verdict =
        engine(&runner).apply(&SpoolerReset, &FixRequest::new(), &NullSink, &CancellationToken::new()).await;

    assert_eq!(verdict.status, FixStatus::Failed);
    assert_eq!(verdict.summary, "spooler-reset aborted by an internal error");
}

#[yare::parameterized(
    spooler_reset = { "spooler-reset" },
    queue_purge = { "queue-purge" },
    printer_resume = { "printer-resume" },
    sharing_firewall = { "sharing-firewall" },
    driver_reinstall = { "driver-reinstall" },
    print_path_repair = { "print-path-repair" },
)]
fn every_fixer_returns_a_verdict(name: &str) {
    let registry = crate::Registry::builtin();
    let fixer = registry.by_name(name).unwrap().fixer();
    let requests = [
        FixRequest::new(),
        FixRequest::new().target(Target::remote("print01.lab")),
        FixRequest::new().printer(PrinterContext::new("lab")).input(FixInput::Automatic),
    ];

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
    for request in &requests {
        let runner = FakeRunner::new();
        let verdict = rt.block_on(engine(&runner).apply(
            fixer.as_ref(),
            request,
            &NullSink,
            &CancellationToken::new(),
        ));
        assert!(!verdict.summary.is_empty());
        assert_eq!(verdict.steps.first().map(|e| e.level), Some(Level::Info));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let verdict = rt.block_on(engine(&runner).apply(fixer.as_ref(), request, &NullSink, &cancel));
        assert!(verdict.cancelled || verdict.status == FixStatus::Warning);
    }
}

#[tokio::test]
async fn remote_target_reaches_runner() {
    let runner = FakeRunner::new();
    let request = FixRequest::new().target(Target::remote("print01.lab"));
    engine(&runner).apply(&SpoolerReset, &request, &NullSink, &CancellationToken::new()).await;

    assert!(runner.calls().iter().all(|c| c.target == Target::remote("print01.lab")));
}

// ---------------------------------------------------------------------------
// Guarded and background runs
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn guarded_runs_on_one_target_do_not_interleave() {
    let runner = FakeRunner::new();
    runner.set_delay(Duration::from_millis(10));
    let engine = engine(&runner);
    let cancel = CancellationToken::new();
    let request = FixRequest::new();

    let first = engine.apply_guarded(&SpoolerReset, &request, &NullSink, &cancel);
    let second = engine.apply_guarded(&SpoolerReset, &request, &NullSink, &cancel);
    let (a, b) = tokio::join!(first, second);

    assert!(a.is_success() && b.is_success());
    let names = runner.call_names();
    assert_eq!(names.len(), 6);
    assert_eq!(names[..3], names[3..]);
    assert_eq!(names[0], "spooler-reset/stop");
    assert_eq!(names[2], "spooler-reset/start");
}

#[tokio::test]
async fn cancel_while_waiting_for_guard() {
    let runner = FakeRunner::new();
    let engine = engine(&runner);
    let request = FixRequest::new();
    let _held = engine.guard().try_acquire(&request.target).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::task::yield_now().await;
        trigger.cancel();
    });
    let recorder = Recorder::default();
    let verdict = engine.apply_guarded(&SpoolerReset, &request, &recorder, &cancel).await;

    assert!(verdict.cancelled);
    assert_eq!(verdict.summary, "spooler-reset cancelled while waiting for local");
    assert_eq!(recorder.messages()[0], "Waiting for another fix on local to finish");
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn waiting_entry_stays_in_trail() {
    let runner = FakeRunner::new();
    let engine = engine(&runner);
    let request = FixRequest::new();
    let held = engine.guard().try_acquire(&request.target).unwrap();
    tokio::spawn(async move {
        tokio::task::yield_now().await;
        drop(held);
    });

    let recorder = Recorder::default();
    let verdict =
        engine.apply_guarded(&SpoolerReset, &request, &recorder, &CancellationToken::new()).await;

    assert!(verdict.is_success());
    assert_eq!(verdict.steps[0].message, "Waiting for another fix on local to finish");
    assert_eq!(*recorder.entries.lock(), verdict.steps);
}

#[tokio::test]
async fn spawn_apply_streams_entries() {
    let runner = FakeRunner::new();
    runner.succeed("spooler-reset/stop", &["[OK] CUPS scheduler stopped"]);
    let engine = engine(&runner);

    let (handle, mut rx) =
        engine.spawn_apply(std::sync::Arc::new(SpoolerReset), FixRequest::new(), CancellationToken::new());
    let verdict = handle.await.unwrap();

    let mut streamed = Vec::new();
    while let Some(entry) = rx.recv().await {
        streamed.push(entry);
    }
    assert_eq!(streamed, verdict.steps);
    assert!(verdict.is_success());
}
