// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leveled, timestamped progress messages.

use serde::{Deserialize, Serialize};

use crate::level::{classify, Level};

/// One progress message produced during a fix run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
    pub epoch_ms: u64,
}

impl LogEntry {
    pub fn new(level: Level, message: impl Into<String>, epoch_ms: u64) -> Self {
        Self { level, message: message.into(), epoch_ms }
    }

    /// Build an entry from a raw output line, leveled by [`classify`].
    pub fn from_output(line: &str, epoch_ms: u64) -> Self {
        Self::new(classify(line), line, epoch_ms)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
