// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use async_trait::async_trait;
use pf_core::{split_lines, Cancelled, ExecutionOutcome, Script, Target};
use pf_shell::{ExecError, Session};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::{failure_message, ScriptRunner};

/// Why the embedded session produced no outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbeddedError {
    /// The script needs shell features the session lacks; nothing ran.
    #[error("unsupported in embedded session: {0}")]
    Unsupported(String),

    #[error("cancelled")]
    Cancelled,
}

/// Runs scripts in-process through a [`Session`].
///
/// The whole script shares one wall-clock limit; a command still running when
/// it expires is killed.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedRunner {
    timeout: Duration,
}

impl Default for EmbeddedRunner {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(60) }
    }
}

impl EmbeddedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pf_core::setters! {
        set {
            timeout: Duration,
        }
    }

    /// Run a script, reporting unsupported syntax separately so a caller can
    /// retry it on a real shell.
    pub async fn try_run(
        &self,
        script: &Script,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, EmbeddedError> {
        let mut session = script
            .vars
            .iter()
            .fold(Session::new(), |session, (name, value)| session.with_var(name, value));

        let limited = tokio::time::timeout(self.timeout, session.run(&script.body, cancel)).await;
        let Ok(result) = limited else {
            tracing::warn!(
                script = %script.name,
                timeout_ms = self.timeout.as_millis() as u64,
                "embedded script timed out"
            );
            let (stdout, _) = session.into_output();
            return Ok(ExecutionOutcome::failure(
                split_lines(stdout.as_bytes()),
                format!("script `{}` timed out after {}s", script.name, self.timeout.as_secs_f64()),
            ));
        };
        let (stdout, stderr) = session.into_output();
        let output = split_lines(stdout.as_bytes());
        let errors = split_lines(stderr.as_bytes());

        let outcome = match result {
            Ok(0) if errors.iter().all(|l| l.trim().is_empty()) => ExecutionOutcome::success(output),
            Ok(code) => ExecutionOutcome::failure(output, failure_message(Some(code), &errors)),
            Err(ExecError::Cancelled) => return Err(EmbeddedError::Cancelled),
            Err(ExecError::Unsupported { feature, .. }) => {
                return Err(EmbeddedError::Unsupported(feature))
            }
            Err(ExecError::CommandFailed { command, exit_code, .. }) => {
                let message = failure_message(Some(exit_code), &errors);
                ExecutionOutcome::failure(output, format!("`{}` failed: {}", command, message))
            }
            Err(e) => ExecutionOutcome::failure(output, e.to_string()),
        };
        Ok(outcome)
    }
}

#[async_trait]
impl ScriptRunner for EmbeddedRunner {
    async fn run(
        &self,
        script: &Script,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, Cancelled> {
        if target.is_remote() {
            return Ok(ExecutionOutcome::failure(
                Vec::new(),
                format!("embedded session cannot reach {}", target),
            ));
        }
        match self.try_run(script, cancel).await {
            Ok(outcome) => Ok(outcome),
            Err(EmbeddedError::Cancelled) => Err(Cancelled),
            Err(e @ EmbeddedError::Unsupported(_)) => {
                Ok(ExecutionOutcome::failure(Vec::new(), e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[path = "embedded_tests.rs"]
mod tests;
