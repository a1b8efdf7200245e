// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution with a hard timeout and cancellation.
//!
//! The child is spawned with `kill_on_drop`, so abandoning the wait on
//! timeout or cancellation kills it.

use std::process::{Output, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("failed to start {label}: {source}")]
    Spawn { label: String, source: std::io::Error },

    #[error("{label} failed: {source}")]
    Io { label: String, source: std::io::Error },

    #[error("{label} timed out after {}s", timeout.as_secs_f64())]
    TimedOut { label: String, timeout: Duration },

    #[error("{label} cancelled")]
    Cancelled { label: String },
}

/// Run `cmd` to completion, writing `stdin` to it and capturing output.
///
/// `label` names the command in errors and logs; it must not contain secrets.
pub async fn run_with_timeout(
    mut cmd: Command,
    stdin: &str,
    timeout: Duration,
    label: &str,
    cancel: &CancellationToken,
) -> Result<Output, SubprocessError> {
    if cancel.is_cancelled() {
        return Err(SubprocessError::Cancelled { label: label.to_string() });
    }

    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
    let mut child = cmd
        .spawn()
        .map_err(|source| SubprocessError::Spawn { label: label.to_string(), source })?;

    let pipe = child.stdin.take();
    let input = stdin.as_bytes().to_vec();
    // The pipe is dropped when the write finishes, closing the child's stdin.
    let feed = async move {
        let Some(mut pipe) = pipe else {
            return Ok(());
        };
        match pipe.write_all(&input).await {
            // The child may exit without reading everything.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    };

    let run = async {
        match tokio::join!(feed, child.wait_with_output()) {
            (Ok(()), Ok(output)) => Ok(output),
            (Err(source), _) | (_, Err(source)) => {
                Err(SubprocessError::Io { label: label.to_string(), source })
            }
        }
    };

    tokio::select! {
        result = tokio::time::timeout(timeout, run) => match result {
            Ok(output) => output,
            Err(_) => {
                tracing::warn!(%label, timeout_ms = timeout.as_millis() as u64, "subprocess timed out");
                Err(SubprocessError::TimedOut { label: label.to_string(), timeout })
            }
        },
        _ = cancel.cancelled() => {
            tracing::debug!(%label, "subprocess cancelled");
            Err(SubprocessError::Cancelled { label: label.to_string() })
        }
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
