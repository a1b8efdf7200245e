// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live progress delivery.

use pf_core::LogEntry;
use tokio::sync::mpsc;

/// Receives each log entry the moment it is produced, in step order.
pub trait ProgressSink: Send + Sync {
    fn report(&self, entry: &LogEntry);
}

impl<F> ProgressSink for F
where
    F: Fn(&LogEntry) + Send + Sync,
{
    fn report(&self, entry: &LogEntry) {
        self(entry)
    }
}

/// Forwards entries to a channel; a dropped receiver is ignored.
impl ProgressSink for mpsc::UnboundedSender<LogEntry> {
    fn report(&self, entry: &LogEntry) {
        let _ = self.send(entry.clone());
    }
}

/// Discards progress; the verdict still carries every entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&self, _entry: &LogEntry) {}
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
