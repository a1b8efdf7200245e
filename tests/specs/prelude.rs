// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers shared by the CLI specs.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// A scratch host: fake CUPS tools on PATH and a private state directory.
pub struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bin")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    /// Install an executable `name` on the sandbox PATH running `body` under sh.
    pub fn fake(&self, name: &str, body: &str) -> &Self {
        let path = self.path().join("bin").join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        self
    }

    /// Run logs written under the state directory.
    pub fn run_logs(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.state_dir().join("logs")) else {
            return Vec::new();
        };
        entries.map(|e| std::fs::read_to_string(e.unwrap().path()).unwrap()).collect()
    }

    pub fn pf(&self) -> Cli {
        let mut cmd = Command::cargo_bin("pf").unwrap();
        let path = format!("{}:/usr/bin:/bin", self.path().join("bin").display());
        cmd.env("PATH", path)
            .env("PF_STATE_DIR", self.state_dir())
            .env("NO_COLOR", "1")
            .env_remove("PF_LOG")
            .env_remove("PF_SHELL")
            .env_remove("PF_SSH_PROGRAM");
        Cli { cmd }
    }
}

/// `pf` without a sandbox, for commands that never run scripts.
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("pf").unwrap();
    cmd.env("NO_COLOR", "1");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and expect exit code 0.
    pub fn passes(self) -> Output {
        self.exits(0)
    }

    /// Run and expect the given exit code.
    pub fn exits(mut self, code: i32) -> Output {
        let output = self.cmd.output().unwrap();
        let result = Output {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        assert_eq!(
            output.status.code(),
            Some(code),
            "unexpected exit status\nstdout:\n{}\nstderr:\n{}",
            result.stdout,
            result.stderr
        );
        result
    }
}

pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {:?}:\n{}", needle, self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {:?}:\n{}", needle, self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {:?}:\n{}", needle, self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}
