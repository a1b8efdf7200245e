// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;

use pf_adapters::FakeRunner;
use pf_core::{FakeClock, FixVerdict, Level, PrinterContext};
use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::fixer::{FixRequest, Fixer};
use crate::sink::NullSink;

pub(super) async fn apply(fixer: &dyn Fixer, runner: &FakeRunner, request: &FixRequest) -> FixVerdict {
    let engine = Engine::new(runner.clone(), FakeClock::new());
    engine.apply(fixer, request, &NullSink, &CancellationToken::new()).await
}

pub(super) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
}

pub(super) fn on_printer(name: &str) -> FixRequest {
    FixRequest::new().printer(PrinterContext::new(name))
}

pub(super) fn messages(verdict: &FixVerdict) -> Vec<&str> {
    verdict.steps.iter().map(|e| e.message.as_str()).collect()
}

pub(super) fn has_entry(verdict: &FixVerdict, level: Level, message: &str) -> bool {
    verdict.steps.iter().any(|e| e.level == level && e.message == message)
}
