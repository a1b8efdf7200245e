// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Final outcome of a fixer invocation.

use serde::{Deserialize, Serialize};

use crate::level::Level;
use crate::log::LogEntry;

/// Overall judgment of a fix run.
///
/// Chosen by the fixer itself; it is not derived from entry levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    Success,
    Warning,
    Failed,
}

crate::simple_display! {
    FixStatus {
        Success => "success",
        Warning => "warning",
        Failed => "failed",
    }
}

impl FixStatus {
    /// The worse of two statuses.
    pub fn worst(self, other: FixStatus) -> FixStatus {
        use FixStatus::*;
        match (self, other) {
            (Failed, _) | (_, Failed) => Failed,
            (Warning, _) | (_, Warning) => Warning,
            _ => Success,
        }
    }
}

/// Returned once per fixer invocation, carrying the full audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixVerdict {
    pub status: FixStatus,
    pub summary: String,
    pub steps: Vec<LogEntry>,
    /// Set when the run stopped because the caller cancelled it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl FixVerdict {
    pub fn new(status: FixStatus, summary: impl Into<String>, steps: Vec<LogEntry>) -> Self {
        Self { status, summary: summary.into(), steps, cancelled: false }
    }

    /// Verdict for a run the caller cancelled.
    pub fn cancelled(summary: impl Into<String>, steps: Vec<LogEntry>) -> Self {
        Self { status: FixStatus::Warning, summary: summary.into(), steps, cancelled: true }
    }

    pub fn is_success(&self) -> bool {
        self.status == FixStatus::Success
    }

    /// Number of entries at the given level.
    pub fn count(&self, level: Level) -> usize {
        self.steps.iter().filter(|e| e.level == level).count()
    }
}

#[cfg(test)]
#[path = "verdict_tests.rs"]
mod tests;
