// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use parking_lot::Mutex;
use pf_core::Level;

use super::*;

#[test]
fn closure_sink_sees_entries() {
    let seen = Mutex::new(Vec::new());
    let sink = |entry: &LogEntry| seen.lock().push(entry.message.clone());
    sink.report(&LogEntry::new(Level::Info, "one", 1));
    sink.report(&LogEntry::new(Level::Success, "two", 2));
    assert_eq!(*seen.lock(), vec!["one", "two"]);
}

#[test]
fn channel_sink_forwards_and_tolerates_closed_receiver() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    tx.report(&LogEntry::new(Level::Warning, "queued", 5));
    assert_eq!(rx.try_recv().unwrap().message, "queued");

    drop(rx);
    tx.report(&LogEntry::new(Level::Info, "nobody listening", 6));
}

#[test]
fn null_sink_is_silent() {
    NullSink.report(&LogEntry::new(Level::Error, "dropped", 0));
}
