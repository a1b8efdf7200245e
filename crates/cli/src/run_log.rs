// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit trail for fixer runs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use pf_core::{FixVerdict, LogEntry};

/// Writes one file per run to `<log_dir>/<run_id>.log`.
///
/// Each append opens, writes and closes the file, which is fine for the
/// handful of entries a run produces. Write failures are traced and
/// swallowed; a broken audit trail must not stop a repair.
pub struct RunLogger {
    path: PathBuf,
}

impl RunLogger {
    pub fn new(log_dir: &Path, run_id: &str) -> Self {
        Self { path: log_dir.join(format!("{}.log", run_id)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format: `2026-01-30T08:14:09.512Z [warning] message`
    pub fn append(&self, entry: &LogEntry) {
        let line = format!("{} [{}] {}", timestamp(entry.epoch_ms), entry.level, entry.message);
        self.write(&line);
    }

    /// Record the run header: which fixer ran where.
    pub fn start(&self, fixer: &str, target: &str, epoch_ms: u64) {
        self.write(&format!("{} [run] {} on {}", timestamp(epoch_ms), fixer, target));
    }

    /// Format: `... [verdict] warning: summary`, with `(cancelled)` when set.
    pub fn finish(&self, verdict: &FixVerdict, epoch_ms: u64) {
        let cancelled = if verdict.cancelled { " (cancelled)" } else { "" };
        self.write(&format!(
            "{} [verdict] {}{}: {}",
            timestamp(epoch_ms),
            verdict.status,
            cancelled,
            verdict.summary
        ));
    }

    fn write(&self, line: &str) {
        if let Err(e) = self.write_line(line) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write run log");
        }
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

fn timestamp(epoch_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[path = "run_log_tests.rs"]
mod tests;
