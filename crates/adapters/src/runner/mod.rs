// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script execution backends.
//!
//! Every backend honors the same contract: output lines come back in emission
//! order, failures become a non-success [`ExecutionOutcome`] with a readable
//! error, and only cancellation escapes as [`Cancelled`].

mod embedded;
mod external;
mod remote;
mod router;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use embedded::{EmbeddedError, EmbeddedRunner};
pub use external::ExternalRunner;
pub use remote::{shell_quote, RemoteRunner};
pub use router::{BackendRouter, Route};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRunner, RunnerCall};

use std::process::Output;

use async_trait::async_trait;
use pf_core::{split_lines, Cancelled, ExecutionOutcome, Script, Target};
use tokio_util::sync::CancellationToken;

use crate::subprocess::SubprocessError;

/// Runs one script against one target.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn run(
        &self,
        script: &Script,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, Cancelled>;
}

/// Wrap a body for `sh -s` so the shell parses all of it before the first
/// command runs, and commands read `/dev/null` instead of the script's tail.
///
/// The leading `:` keeps an empty or comment-only body valid.
pub(crate) fn stdin_script(body: &str) -> String {
    let mut text = String::with_capacity(body.len() + 24);
    text.push_str("{ :\n");
    text.push_str(body);
    if !body.ends_with('\n') {
        text.push('\n');
    }
    text.push_str("} </dev/null\n");
    text
}

/// Outcome for a finished process: success needs exit 0 and a silent stderr.
pub(crate) fn outcome_from_output(output: &Output) -> ExecutionOutcome {
    let lines = split_lines(&output.stdout);
    let errors = split_lines(&output.stderr);
    if output.status.success() && errors.iter().all(|l| l.trim().is_empty()) {
        return ExecutionOutcome::success(lines);
    }
    ExecutionOutcome::failure(lines, failure_message(output.status.code(), &errors))
}

/// Human-readable failure text from an exit code and stderr lines.
pub(crate) fn failure_message(code: Option<i32>, stderr: &[String]) -> String {
    let detail = stderr
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    match (code, detail.is_empty()) {
        (Some(0), _) => detail,
        (Some(code), true) => format!("exit code {}", code),
        (Some(code), false) => format!("exit code {}: {}", code, detail),
        (None, true) => "terminated by signal".to_string(),
        (None, false) => format!("terminated by signal: {}", detail),
    }
}

/// Map a subprocess result onto the backend contract.
pub(crate) fn outcome_from_subprocess(
    result: Result<Output, SubprocessError>,
) -> Result<ExecutionOutcome, Cancelled> {
    match result {
        Ok(output) => Ok(outcome_from_output(&output)),
        Err(SubprocessError::Cancelled { .. }) => Err(Cancelled),
        Err(e) => Ok(ExecutionOutcome::failure(Vec::new(), e.to_string())),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
