// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-run state shared by every fixer: step execution, progress reporting
//! and sub-fixer composition.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures_util::FutureExt;
use pf_adapters::ScriptRunner;
use pf_core::{
    Cancelled, Clock, ExecutionOutcome, FixInput, FixStatus, FixVerdict, Level, LogEntry,
    PrinterContext, Script, Target,
};
use tokio_util::sync::CancellationToken;

use crate::fixer::{input_problem, FixRequest, Fixer};
use crate::sink::ProgressSink;

/// Handle a fixer uses to run its steps.
///
/// Every entry is appended to the run's trail and handed to the sink before
/// the call returns, so the sink sees entries in step order.
pub struct FixContext<'a> {
    request: &'a FixRequest,
    runner: &'a dyn ScriptRunner,
    sink: &'a dyn ProgressSink,
    clock: &'a dyn Clock,
    cancel: &'a CancellationToken,
    steps: Vec<LogEntry>,
    commands: usize,
}

impl<'a> FixContext<'a> {
    pub fn new(
        request: &'a FixRequest,
        runner: &'a dyn ScriptRunner,
        sink: &'a dyn ProgressSink,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self { request, runner, sink, clock, cancel, steps: Vec::new(), commands: 0 }
    }

    /// A fresh trail sharing this run's request, backend and sink.
    fn child(&self) -> FixContext<'a> {
        FixContext::new(self.request, self.runner, self.sink, self.clock, self.cancel)
    }

    pub fn printer(&self) -> Option<&'a PrinterContext> {
        self.request.printer.as_ref()
    }

    pub fn target(&self) -> &'a Target {
        &self.request.target
    }

    pub fn input(&self) -> Option<&'a FixInput> {
        self.request.input.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Entries produced so far.
    pub fn steps(&self) -> &[LogEntry] {
        &self.steps
    }

    /// Scripts issued so far, including those of delegated fixers.
    pub fn commands_issued(&self) -> usize {
        self.commands
    }

    pub(crate) fn take_steps(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.steps)
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    pub fn log(&mut self, level: Level, message: impl Into<String>) {
        let entry = LogEntry::new(level, message, self.clock.epoch_ms());
        self.push(entry);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(Level::Success, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    fn push(&mut self, entry: LogEntry) {
        self.sink.report(&entry);
        self.steps.push(entry);
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    /// Run one script and report its output lines, classified.
    ///
    /// No step starts once cancellation is observed.
    pub async fn run(&mut self, script: Script) -> Result<ExecutionOutcome, Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        self.commands += 1;

        let started = Instant::now();
        let outcome = self.runner.run(&script, self.target(), self.cancel).await?;
        tracing::debug!(
            script = %script.name,
            backend = %script.backend,
            target = %self.target(),
            success = outcome.success,
            lines = outcome.output.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "step finished"
        );

        for line in outcome.output.iter().filter(|l| !l.trim().is_empty()) {
            let entry = LogEntry::from_output(line, self.clock.epoch_ms());
            self.push(entry);
        }
        Ok(outcome)
    }

    /// Run a step whose failure is fatal; the failure is logged as Error.
    pub async fn exec(&mut self, script: Script) -> Result<ExecutionOutcome, Cancelled> {
        self.run_logged(script, Level::Error).await
    }

    /// Run a step whose failure is recoverable; the failure is logged as Warning.
    pub async fn exec_lenient(&mut self, script: Script) -> Result<ExecutionOutcome, Cancelled> {
        self.run_logged(script, Level::Warning).await
    }

    async fn run_logged(
        &mut self,
        script: Script,
        level: Level,
    ) -> Result<ExecutionOutcome, Cancelled> {
        let name = script.name.clone();
        let outcome = self.run(script).await?;
        if !outcome.success {
            let reason = outcome.error.as_deref().unwrap_or("no error reported");
            self.log(level, format!("Step {} failed: {}", name, reason));
        }
        Ok(outcome)
    }

    /// Run another fixer as one step, splicing its entries into this trail.
    pub async fn delegate(&mut self, fixer: &dyn Fixer) -> Result<FixVerdict, Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        let descriptor = fixer.descriptor();
        let mut child = self.child();
        child.info(format!("Running {}", descriptor.name));

        let requirement = fixer.input_requirement();
        let result = match input_problem(requirement.as_ref(), child.input()) {
            Some(problem) => {
                child.warn(format!("{} skipped: {}", descriptor.name, problem));
                Ok(child.finish(FixStatus::Warning, problem))
            }
            None => {
                // Splice what the sink already saw before letting a panic
                // reach the engine.
                let applied = AssertUnwindSafe(fixer.apply(&mut child)).catch_unwind().await;
                match applied {
                    Ok(result) => result,
                    Err(payload) => {
                        self.commands += child.commands;
                        self.steps.append(&mut child.steps);
                        std::panic::resume_unwind(payload);
                    }
                }
            }
        };

        self.commands += child.commands;
        match result {
            Ok(verdict) => {
                self.steps.extend(verdict.steps.iter().cloned());
                Ok(verdict)
            }
            Err(Cancelled) => {
                self.steps.append(&mut child.steps);
                Err(Cancelled)
            }
        }
    }

    /// Close the run: report the summary at the level matching `status` and
    /// hand back the full trail.
    pub fn finish(&mut self, status: FixStatus, summary: impl Into<String>) -> FixVerdict {
        let summary = summary.into();
        let level = match status {
            FixStatus::Success => Level::Success,
            FixStatus::Warning => Level::Warning,
            FixStatus::Failed => Level::Error,
        };
        self.log(level, summary.clone());
        FixVerdict::new(status, summary, self.take_steps())
    }

    /// Close a run the caller cancelled.
    pub(crate) fn finish_cancelled(&mut self, summary: String) -> FixVerdict {
        self.warn(summary.clone());
        FixVerdict::cancelled(summary, self.take_steps())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
