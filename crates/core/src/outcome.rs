// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result of running one script through a backend.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Produced once per script invocation; never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    /// Output lines in emission order.
    pub output: Vec<String>,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    pub fn success(output: Vec<String>) -> Self {
        Self { success: true, output, error: None }
    }

    pub fn failure(output: Vec<String>, error: impl Into<String>) -> Self {
        Self { success: false, output, error: Some(error.into()) }
    }
}

/// The caller cancelled the run.
///
/// Kept apart from ordinary failure so it can propagate to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cancelled")]
pub struct Cancelled;

/// Split captured bytes into lines, decoding lossily as UTF-8.
///
/// A trailing newline does not produce an empty final line; CRLF is treated
/// as a single line break.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    if bytes.is_empty() {
        return Vec::new();
    }
    String::from_utf8_lossy(bytes)
        .lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
