// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Severity levels and output-line classification.

use serde::{Deserialize, Serialize};

/// Severity of a single progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

crate::simple_display! {
    Level {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
    }
}

/// Tags a script prints at the start of a line to set its level.
const TAGS: [(&str, Level); 3] =
    [("[OK]", Level::Success), ("[WARN]", Level::Warning), ("[ERROR]", Level::Error)];

/// Classify one line of command output.
///
/// Leading whitespace is skipped, then the line must start with a literal,
/// case-sensitive tag. Anything else is `Info`.
pub fn classify(line: &str) -> Level {
    let content = line.trim_start();
    TAGS.iter()
        .find(|(tag, _)| content.starts_with(tag))
        .map(|(_, level)| *level)
        .unwrap_or(Level::Info)
}

#[cfg(test)]
#[path = "level_tests.rs"]
mod tests;
