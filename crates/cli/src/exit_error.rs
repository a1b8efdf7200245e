// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, so `main()` owns process termination.

use std::fmt;

use pf_core::{FixStatus, FixVerdict};

pub const FAILED: i32 = 1;
pub const WARNING: i32 = 2;
/// Conventional 128 + SIGINT.
pub const CANCELLED: i32 = 130;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Exit status for a finished run, or `None` for a clean success.
    pub fn from_verdict(verdict: &FixVerdict) -> Option<Self> {
        let code = match (verdict.cancelled, verdict.status) {
            (true, _) => CANCELLED,
            (false, FixStatus::Success) => return None,
            (false, FixStatus::Warning) => WARNING,
            (false, FixStatus::Failed) => FAILED,
        };
        Some(Self::new(code, ""))
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
