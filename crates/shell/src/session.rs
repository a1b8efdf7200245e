// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process session that runs parsed scripts without a host shell.
//!
//! Builtins run inside the session; every other simple command is spawned
//! directly with its expanded argv. Output is captured in emission order.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::ast::{AndOrList, CommandList, LogicalOp, SimpleCommand, Word, WordPart};
use crate::error::ExecError;
use crate::parser::Parser;

/// How a statement finished.
enum Flow {
    /// Continue with the next statement; carries the exit status.
    Next(i32),
    /// `exit` was called.
    Exit(i32),
}

/// State for one embedded script run.
#[derive(Debug, Default)]
pub struct Session {
    vars: HashMap<String, String>,
    exported: HashSet<String>,
    /// Inherited variables removed with `unset`.
    removed: HashSet<String>,
    cwd: Option<PathBuf>,
    last_status: i32,
    stdout: String,
    stderr: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set and export a variable before the script runs.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.exported.insert(name.clone());
        self.vars.insert(name, value.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Current value of a variable, falling back to the process environment.
    pub fn var(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if self.removed.contains(name) {
            return None;
        }
        std::env::var(name).ok()
    }

    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Consume the session, returning captured `(stdout, stderr)`.
    pub fn into_output(self) -> (String, String) {
        (self.stdout, self.stderr)
    }

    /// Parse and run a script. Unsupported syntax is rejected before any
    /// command runs.
    pub async fn run(&mut self, script: &str, cancel: &CancellationToken) -> Result<i32, ExecError> {
        let list = Parser::parse(script)?;
        self.execute(&list, cancel).await
    }

    /// Run a parsed command list with fail-fast (`set -e`) semantics.
    pub async fn execute(
        &mut self,
        list: &CommandList,
        cancel: &CancellationToken,
    ) -> Result<i32, ExecError> {
        for and_or in &list.commands {
            match self.execute_and_or(and_or, cancel).await? {
                Flow::Exit(code) => {
                    self.last_status = code;
                    return Ok(code);
                }
                Flow::Next(_) => {}
            }
        }
        Ok(self.last_status)
    }

    // -----------------------------------------------------------------------
    // AND / OR chains
    // -----------------------------------------------------------------------

    async fn execute_and_or(
        &mut self,
        and_or: &AndOrList,
        cancel: &CancellationToken,
    ) -> Result<Flow, ExecError> {
        let mut status = match self.execute_simple(&and_or.first, cancel).await? {
            Flow::Exit(code) => return Ok(Flow::Exit(code)),
            Flow::Next(status) => status,
        };
        let mut ran_last = and_or.rest.is_empty();
        let mut failed_command = &and_or.first;

        for (i, (op, cmd)) in and_or.rest.iter().enumerate() {
            let should_run = match op {
                LogicalOp::And => status == 0,
                LogicalOp::Or => status != 0,
            };
            if !should_run {
                continue;
            }
            status = match self.execute_simple(cmd, cancel).await? {
                Flow::Exit(code) => return Ok(Flow::Exit(code)),
                Flow::Next(status) => status,
            };
            failed_command = cmd;
            ran_last = i + 1 == and_or.rest.len();
        }

        if status != 0 && ran_last {
            return Err(ExecError::CommandFailed {
                command: self.describe(failed_command),
                exit_code: status,
                span: and_or.span,
            });
        }
        Ok(Flow::Next(status))
    }

    // -----------------------------------------------------------------------
    // Simple commands
    // -----------------------------------------------------------------------

    async fn execute_simple(
        &mut self,
        cmd: &SimpleCommand,
        cancel: &CancellationToken,
    ) -> Result<Flow, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }

        let env: Vec<(String, String)> =
            cmd.env.iter().map(|a| (a.name.clone(), self.expand(&a.value))).collect();

        let Some(name_word) = &cmd.name else {
            for (name, value) in env {
                self.removed.remove(&name);
                self.vars.insert(name, value);
            }
            return Ok(self.finish(0));
        };

        let name = self.expand(name_word);
        let args = self.expand_args(&cmd.args);
        tracing::debug!(command = %name, args = args.len(), "session command");

        let status = match name.as_str() {
            "echo" => self.echo(&args),
            "true" | ":" => 0,
            "false" => 1,
            "exit" => {
                let code = match args.first() {
                    Some(arg) => arg.parse().unwrap_or(2),
                    None => self.last_status,
                };
                return Ok(Flow::Exit(code));
            }
            "export" => self.export(&args),
            "unset" => self.unset(&args),
            "cd" => self.cd(&args),
            "" if name_word.is_bare_expansion() => 0,
            _ => self.spawn(&name, &args, &env, cmd, cancel).await?,
        };
        Ok(self.finish(status))
    }

    fn finish(&mut self, status: i32) -> Flow {
        self.last_status = status;
        Flow::Next(status)
    }

    async fn spawn(
        &mut self,
        name: &str,
        args: &[String],
        env: &[(String, String)],
        cmd: &SimpleCommand,
        cancel: &CancellationToken,
    ) -> Result<i32, ExecError> {
        let start = Instant::now();
        let mut process = tokio::process::Command::new(name);
        process.args(args);
        if let Some(cwd) = &self.cwd {
            process.current_dir(cwd);
        }
        for removed in &self.removed {
            process.env_remove(removed);
        }
        for exported in &self.exported {
            if let Some(value) = self.vars.get(exported) {
                process.env(exported, value);
            }
        }
        process.envs(env.iter().map(|(k, v)| (k, v)));
        process
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match process.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.push_stderr(&format!("{}: not found", name));
                return Ok(127);
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                self.push_stderr(&format!("{}: permission denied", name));
                return Ok(126);
            }
            Err(source) => {
                return Err(ExecError::SpawnFailed {
                    command: name.to_string(),
                    source,
                    span: cmd.span,
                })
            }
        };

        // Dropping the child on cancellation kills it.
        let waited = tokio::select! {
            output = child.wait_with_output() => output,
            _ = cancel.cancelled() => {
                tracing::debug!(command = %name, "session command cancelled");
                return Err(ExecError::Cancelled);
            }
        };
        let output = waited.map_err(|source| ExecError::SpawnFailed {
            command: name.to_string(),
            source,
            span: cmd.span,
        })?;

        self.stdout.push_str(&String::from_utf8_lossy(&output.stdout));
        self.stderr.push_str(&String::from_utf8_lossy(&output.stderr));

        let status = output.status.code().unwrap_or(-1);
        tracing::debug!(
            command = %name,
            exit_code = status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "session command finished"
        );
        Ok(status)
    }

    // -----------------------------------------------------------------------
    // Builtins
    // -----------------------------------------------------------------------

    fn echo(&mut self, args: &[String]) -> i32 {
        let (newline, args) = match args.first().map(String::as_str) {
            Some("-n") => (false, &args[1..]),
            _ => (true, args),
        };
        self.stdout.push_str(&args.join(" "));
        if newline {
            self.stdout.push('\n');
        }
        0
    }

    fn export(&mut self, args: &[String]) -> i32 {
        let mut status = 0;
        for arg in args {
            let (name, value) = match arg.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (arg.as_str(), None),
            };
            if !crate::ast::is_name(name) {
                self.push_stderr(&format!("export: {}: bad variable name", name));
                status = 1;
                continue;
            }
            if let Some(value) = value {
                self.vars.insert(name.to_string(), value.to_string());
            } else if !self.vars.contains_key(name) {
                if let Some(inherited) = self.var(name) {
                    self.vars.insert(name.to_string(), inherited);
                }
            }
            self.removed.remove(name);
            self.exported.insert(name.to_string());
        }
        status
    }

    fn unset(&mut self, args: &[String]) -> i32 {
        for name in args {
            self.vars.remove(name);
            self.exported.remove(name);
            self.removed.insert(name.clone());
        }
        0
    }

    fn cd(&mut self, args: &[String]) -> i32 {
        let target = match args.first() {
            Some(dir) => PathBuf::from(dir),
            None => match self.var("HOME") {
                Some(home) => PathBuf::from(home),
                None => return 0,
            },
        };
        let resolved = match (&self.cwd, target.is_absolute()) {
            (Some(cwd), false) => cwd.join(&target),
            _ => target,
        };
        if !Path::new(&resolved).is_dir() {
            self.push_stderr(&format!("cd: can't cd to {}", resolved.display()));
            return 2;
        }
        self.cwd = Some(resolved);
        0
    }

    fn push_stderr(&mut self, line: &str) {
        self.stderr.push_str(line);
        self.stderr.push('\n');
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    fn expand(&self, word: &Word) -> String {
        let mut out = String::new();
        for part in &word.parts {
            match part {
                WordPart::Literal(s) | WordPart::Quoted(s) => out.push_str(s),
                WordPart::Variable(name) => out.push_str(&self.var(name).unwrap_or_default()),
                WordPart::LastStatus => out.push_str(&self.last_status.to_string()),
            }
        }
        out
    }

    /// Expand arguments, dropping unquoted expansions that come out empty.
    fn expand_args(&self, words: &[Word]) -> Vec<String> {
        words
            .iter()
            .filter_map(|word| {
                let value = self.expand(word);
                (!value.is_empty() || !word.is_bare_expansion()).then_some(value)
            })
            .collect()
    }

    fn describe(&self, cmd: &SimpleCommand) -> String {
        match &cmd.name {
            Some(name) => self.expand(name),
            None => cmd.env.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(" "),
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
