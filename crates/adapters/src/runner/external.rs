// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Cancelled, ExecutionOutcome, Script, Target};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::{outcome_from_subprocess, stdin_script, ScriptRunner};
use crate::env::RunnerConfig;
use crate::subprocess::run_with_timeout;

/// Runs scripts with a host interpreter (`sh -s`), feeding the body on stdin.
///
/// Commands in the body get `/dev/null` as stdin; see [`stdin_script`].
#[derive(Debug, Clone)]
pub struct ExternalRunner {
    config: RunnerConfig,
}

impl ExternalRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    fn command(&self, script: &Script) -> Command {
        let mut cmd = Command::new(&self.config.shell);
        cmd.arg("-s");
        cmd.envs(script.vars.iter().map(|(k, v)| (k, v)));
        cmd
    }
}

#[async_trait]
impl ScriptRunner for ExternalRunner {
    async fn run(
        &self,
        script: &Script,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, Cancelled> {
        if target.is_remote() {
            return Ok(ExecutionOutcome::failure(
                Vec::new(),
                format!("external interpreter cannot reach {}", target),
            ));
        }

        tracing::debug!(script = %script.name, shell = %self.config.shell.display(), "running external script");
        let label = format!("script `{}`", script.name);
        let body = stdin_script(&script.body);
        let result =
            run_with_timeout(self.command(script), &body, self.config.timeout, &label, cancel).await;
        outcome_from_subprocess(result)
    }
}

#[cfg(test)]
#[path = "external_tests.rs"]
mod tests;
