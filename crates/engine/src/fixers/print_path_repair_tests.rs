// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use pf_adapters::FakeRunner;
use pf_core::Level;

use super::*;
use crate::fixer::FixRequest;
use crate::fixers::test_helpers::{apply, has_entry, messages, on_printer};

fn position(verdict: &FixVerdict, message: &str) -> usize {
    messages(verdict).iter().position(|m| *m == message).unwrap()
}

#[tokio::test]
async fn runs_sub_fixers_in_order() {
    let runner = FakeRunner::new();
    let verdict = apply(&PrintPathRepair, &runner, &on_printer("lab")).await;

    assert_eq!(verdict.status, FixStatus::Success);
    let purge = position(&verdict, "Running queue-purge");
    let reset = position(&verdict, "Running spooler-reset");
    let resume = position(&verdict, "Running printer-resume");
    assert!(purge < reset && reset < resume);
    assert_eq!(runner.call_names().first().map(String::as_str), Some("queue-purge/purge"));
    assert_eq!(runner.call_names().last().map(String::as_str), Some("printer-resume/accept"));
}

#[tokio::test]
async fn tolerates_failed_purge() {
    let runner = FakeRunner::new();
    runner.fail("queue-purge/purge", "exit code 1");
    let verdict = apply(&PrintPathRepair, &runner, &on_printer("lab")).await;

    // The sub-fixer itself failed...
    assert!(has_entry(&verdict, Level::Error, "Jobs could not be cancelled"));
    // ...but this fixer judges the repair acceptable.
    assert_eq!(verdict.status, FixStatus::Warning);
    assert_eq!(verdict.summary, "Print path repaired with warnings");
    assert!(runner.call_names().contains(&"spooler-reset/start".to_string()));
}

#[tokio::test]
async fn failed_reset_is_fatal() {
    let runner = FakeRunner::new();
    runner.fail("spooler-reset/start", "exit code 1");
    let verdict = apply(&PrintPathRepair, &runner, &on_printer("lab")).await;

    assert_eq!(verdict.status, FixStatus::Failed);
    assert!(!runner.call_names().iter().any(|n| n.starts_with("printer-resume/")));
}

#[tokio::test]
async fn failed_resume_is_tolerated() {
    let runner = FakeRunner::new();
    runner.fail("printer-resume/enable", "exit code 1");
    let verdict = apply(&PrintPathRepair, &runner, &on_printer("lab")).await;
    assert_eq!(verdict.status, FixStatus::Warning);
}

#[tokio::test]
async fn skips_resume_without_printer() {
    let runner = FakeRunner::new();
    let verdict = apply(&PrintPathRepair, &runner, &FixRequest::new()).await;

    assert_eq!(verdict.status, FixStatus::Success);
    assert!(has_entry(&verdict, Level::Info, "No printer selected, skipping printer-resume"));
    assert!(!runner.call_names().iter().any(|n| n.starts_with("printer-resume/")));
}
