// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote execution over ssh.
//!
//! The script travels on stdin to `sh -s` on the far side, prefixed with one
//! `export` line per variable. Commands in the script read `/dev/null`, not
//! the rest of the script. Credentials are only ever placed in argv for
//! the ssh client; they are not logged.

use async_trait::async_trait;
use pf_core::{Cancelled, ExecutionOutcome, RemoteHost, Script, Target};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use super::{outcome_from_subprocess, stdin_script, ScriptRunner};
use crate::env::RunnerConfig;
use crate::subprocess::run_with_timeout;

/// Exit status ssh reserves for its own failures.
const SSH_ERROR_STATUS: i32 = 255;

#[derive(Debug, Clone)]
pub struct RemoteRunner {
    config: RunnerConfig,
}

impl RemoteRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Arguments for the ssh client, ending with the remote command.
    pub fn ssh_args(&self, remote: &RemoteHost) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("ConnectTimeout={}", self.config.connect_timeout),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
        ];

        let credentials = remote.credentials.as_ref();
        if let Some(identity) = credentials.and_then(|c| c.identity_file.as_ref()) {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }

        if let Some(port) = remote.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }

        let destination = match credentials.and_then(|c| c.username.as_deref()) {
            Some(user) => format!("{}@{}", user, remote.host),
            None => remote.host.clone(),
        };
        args.push(destination);

        args.push("sh".to_string());
        args.push("-s".to_string());
        args
    }

    /// The text streamed to the remote shell.
    pub fn envelope(script: &Script) -> Result<String, String> {
        let mut text = String::with_capacity(script.body.len() + 64);
        for (name, value) in &script.vars {
            if !pf_shell::is_name(name) {
                return Err(format!("invalid variable name `{}`", name));
            }
            text.push_str(&format!("export {}={}\n", name, shell_quote(value)));
        }
        text.push_str(&stdin_script(&script.body));
        Ok(text)
    }
}

/// Quote a value for POSIX sh: `it's` becomes `'it'\''s'`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[async_trait]
impl ScriptRunner for RemoteRunner {
    async fn run(
        &self,
        script: &Script,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, Cancelled> {
        let Target::Remote(remote) = target else {
            return Ok(ExecutionOutcome::failure(Vec::new(), "remote execution needs a host"));
        };
        let envelope = match Self::envelope(script) {
            Ok(envelope) => envelope,
            Err(e) => return Ok(ExecutionOutcome::failure(Vec::new(), e)),
        };

        tracing::debug!(script = %script.name, host = %remote.host, "running remote script");
        let mut cmd = Command::new(&self.config.ssh_program);
        cmd.args(self.ssh_args(remote));
        let label = format!("remote script `{}` on {}", script.name, remote.host);
        let result = run_with_timeout(cmd, &envelope, self.config.timeout, &label, cancel).await;

        let connection_failed =
            matches!(&result, Ok(output) if output.status.code() == Some(SSH_ERROR_STATUS));
        let mut outcome = outcome_from_subprocess(result)?;
        if connection_failed {
            let detail = outcome.error.take().unwrap_or_default();
            outcome.error = Some(format!("connection to {} failed: {}", remote.host, detail));
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
