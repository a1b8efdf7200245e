// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted runner for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pf_core::{Backend, Cancelled, ExecutionOutcome, Script, Target};
use tokio_util::sync::CancellationToken;

use super::ScriptRunner;

/// Recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerCall {
    pub name: String,
    pub body: String,
    pub vars: Vec<(String, String)>,
    pub backend: Backend,
    pub target: Target,
}

impl RunnerCall {
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct FakeRunnerState {
    /// Queued outcomes per script name; the last one repeats.
    responses: HashMap<String, VecDeque<ExecutionOutcome>>,
    calls: Vec<RunnerCall>,
    delay: Option<Duration>,
    cancel_on: Option<(String, CancellationToken)>,
    panic_on: Option<String>,
}

/// Fake runner; unscripted scripts succeed with no output.
#[derive(Clone, Default)]
pub struct FakeRunner {
    inner: Arc<Mutex<FakeRunnerState>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an outcome for scripts named `name`.
    pub fn respond(&self, name: &str, outcome: ExecutionOutcome) -> &Self {
        self.inner.lock().responses.entry(name.to_string()).or_default().push_back(outcome);
        self
    }

    /// Queue a success printing `lines`.
    pub fn succeed(&self, name: &str, lines: &[&str]) -> &Self {
        self.respond(name, ExecutionOutcome::success(lines.iter().map(|l| l.to_string()).collect()))
    }

    /// Queue a failure with `error`.
    pub fn fail(&self, name: &str, error: &str) -> &Self {
        self.respond(name, ExecutionOutcome::failure(Vec::new(), error))
    }

    /// Make every call take `delay` (cancellable).
    pub fn set_delay(&self, delay: Duration) -> &Self {
        self.inner.lock().delay = Some(delay);
        self
    }

    /// Cancel `token` when a script named `name` starts.
    pub fn cancel_on(&self, name: &str, token: CancellationToken) -> &Self {
        self.inner.lock().cancel_on = Some((name.to_string(), token));
        self
    }

    /// Panic when a script named `name` runs.
    pub fn panic_on(&self, name: &str) -> &Self {
        self.inner.lock().panic_on = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.inner.lock().calls.clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.inner.lock().calls.iter().map(|c| c.name.clone()).collect()
    }

    fn next_outcome(&self, name: &str) -> ExecutionOutcome {
        let mut state = self.inner.lock();
        match state.responses.get_mut(name) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Some(queue) => queue.front().cloned().unwrap_or_default(),
            None => ExecutionOutcome::success(Vec::new()),
        }
    }
}

#[async_trait]
impl ScriptRunner for FakeRunner {
    #[allow(clippy::panic)]
    async fn run(
        &self,
        script: &Script,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, Cancelled> {
        let (delay, trigger, panics) = {
            let mut state = self.inner.lock();
            state.calls.push(RunnerCall {
                name: script.name.clone(),
                body: script.body.clone(),
                vars: script.vars.clone(),
                backend: script.backend,
                target: target.clone(),
            });
            let trigger = state
                .cancel_on
                .as_ref()
                .filter(|(name, _)| *name == script.name)
                .map(|(_, token)| token.clone());
            (state.delay, trigger, state.panic_on.as_deref() == Some(script.name.as_str()))
        };

        if panics {
            panic!("fake runner told to panic on `{}`", script.name);
        }
        if let Some(token) = trigger {
            token.cancel();
        }
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        if let Some(delay) = delay {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = cancel.cancelled() => return Err(Cancelled),
            }
        }
        Ok(self.next_outcome(&script.name))
    }
}
