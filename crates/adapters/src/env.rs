// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the execution backends.

use std::path::PathBuf;
use std::time::Duration;

/// Interpreter for external scripts (default `/bin/sh`, `PF_SHELL`).
pub fn shell_program() -> PathBuf {
    std::env::var("PF_SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/bin/sh"))
}

/// Hard limit per external or remote script (default 60s, `PF_EXEC_TIMEOUT_MS`).
pub fn exec_timeout() -> Duration {
    std::env::var("PF_EXEC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(60))
}

/// Remote transport client (default `ssh`, `PF_SSH_PROGRAM`).
pub fn ssh_program() -> PathBuf {
    std::env::var("PF_SSH_PROGRAM")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ssh"))
}

/// `ConnectTimeout` passed to ssh, in seconds (default 10, `PF_SSH_CONNECT_TIMEOUT`).
pub fn ssh_connect_timeout() -> u64 {
    std::env::var("PF_SSH_CONNECT_TIMEOUT")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10)
}

/// Backend settings resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub shell: PathBuf,
    pub timeout: Duration,
    pub ssh_program: PathBuf,
    pub connect_timeout: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            timeout: Duration::from_secs(60),
            ssh_program: PathBuf::from("ssh"),
            connect_timeout: 10,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self {
            shell: shell_program(),
            timeout: exec_timeout(),
            ssh_program: ssh_program(),
            connect_timeout: ssh_connect_timeout(),
        }
    }

    pf_core::setters! {
        into {
            shell: PathBuf,
            ssh_program: PathBuf,
        }
        set {
            timeout: Duration,
            connect_timeout: u64,
        }
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
