// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `apply` boundary: every run ends in a verdict.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use pf_adapters::ScriptRunner;
use pf_core::{Clock, FixStatus, FixVerdict, Level, LogEntry};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::context::FixContext;
use crate::fixer::{input_problem, FixRequest, Fixer};
use crate::guard::TargetGuard;
use crate::sink::ProgressSink;

/// Runs fixers against a backend.
pub struct Engine<R, C> {
    runner: Arc<R>,
    clock: C,
    guard: TargetGuard,
}

impl<R, C: Clone> Clone for Engine<R, C> {
    fn clone(&self) -> Self {
        Self { runner: Arc::clone(&self.runner), clock: self.clock.clone(), guard: self.guard.clone() }
    }
}

impl<R, C> Engine<R, C>
where
    R: ScriptRunner,
    C: Clock,
{
    pub fn new(runner: R, clock: C) -> Self {
        Self { runner: Arc::new(runner), clock, guard: TargetGuard::new() }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn guard(&self) -> &TargetGuard {
        &self.guard
    }

    /// Run one fixer to a verdict.
    ///
    /// Missing input, cancellation and panics inside the fixer all become
    /// verdicts; nothing escapes.
    pub async fn apply(
        &self,
        fixer: &dyn Fixer,
        request: &FixRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> FixVerdict {
        let descriptor = fixer.descriptor();
        let started = Instant::now();
        let mut ctx = FixContext::new(request, &*self.runner, sink, &self.clock, cancel);

        ctx.info(format!("Starting {}: {}", descriptor.name, descriptor.description));

        if let Some(problem) =
            input_problem(fixer.input_requirement().as_ref(), request.input.as_ref())
        {
            tracing::info!(fixer = descriptor.name, %problem, "fixer not started");
            return ctx.finish(FixStatus::Warning, format!("{} not run: {}", descriptor.name, problem));
        }

        if cancel.is_cancelled() {
            return ctx.finish_cancelled(format!("{} cancelled before any step ran", descriptor.name));
        }

        let result = AssertUnwindSafe(fixer.apply(&mut ctx)).catch_unwind().await;
        let verdict = match result {
            Ok(Ok(mut verdict)) => {
                // A fixer that built its own verdict leaves entries behind.
                verdict.steps.extend(ctx.take_steps());
                verdict
            }
            Ok(Err(_)) => {
                ctx.finish_cancelled(format!("{} cancelled, remaining steps skipped", descriptor.name))
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::error!(fixer = descriptor.name, %reason, "fixer panicked");
                ctx.error(format!("Internal error in {}: {}", descriptor.name, reason));
                ctx.finish(FixStatus::Failed, format!("{} aborted by an internal error", descriptor.name))
            }
        };

        tracing::info!(
            fixer = descriptor.name,
            target = %request.target,
            status = %verdict.status,
            cancelled = verdict.cancelled,
            entries = verdict.steps.len(),
            commands = ctx.commands_issued(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fixer finished"
        );
        verdict
    }

    /// Like [`Engine::apply`], but waits for any other guarded run on the
    /// same target to finish first.
    pub async fn apply_guarded(
        &self,
        fixer: &dyn Fixer,
        request: &FixRequest,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> FixVerdict {
        let (held, waiting) = match self.guard.try_acquire(&request.target) {
            Some(held) => (held, None),
            None => {
                let name = fixer.descriptor().name;
                let message = format!("Waiting for another fix on {} to finish", request.target);
                let waiting = LogEntry::new(Level::Info, message, self.clock.epoch_ms());
                sink.report(&waiting);
                tokio::select! {
                    held = self.guard.acquire(&request.target) => (held, Some(waiting)),
                    _ = cancel.cancelled() => {
                        let summary = format!("{} cancelled while waiting for {}", name, request.target);
                        let entry = LogEntry::new(Level::Warning, summary.clone(), self.clock.epoch_ms());
                        sink.report(&entry);
                        return FixVerdict::cancelled(summary, vec![waiting, entry]);
                    }
                }
            }
        };
        let mut verdict = self.apply(fixer, request, sink, cancel).await;
        drop(held);
        if let Some(waiting) = waiting {
            verdict.steps.insert(0, waiting);
        }
        verdict
    }
}

impl<R, C> Engine<R, C>
where
    R: ScriptRunner + 'static,
    C: Clock + Clone + 'static,
{
    /// Run a guarded fixer on a background task, streaming entries as they
    /// are produced.
    pub fn spawn_apply(
        &self,
        fixer: Arc<dyn Fixer>,
        request: FixRequest,
        cancel: CancellationToken,
    ) -> (JoinHandle<FixVerdict>, mpsc::UnboundedReceiver<LogEntry>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = self.clone();
        let handle = tokio::spawn(async move {
            engine.apply_guarded(fixer.as_ref(), &request, &tx, &cancel).await
        });
        (handle, rx)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "unknown panic".to_string()
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
