// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use clap::ValueEnum;
use pf_core::{classify, Level, LogEntry};
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn tag(level: Level) -> &'static str {
    match level {
        Level::Info => "",
        Level::Success => "[OK]",
        Level::Warning => "[WARN]",
        Level::Error => "[ERROR]",
    }
}

/// Render a progress entry as one uncolored line.
///
/// Script output already carries its tag; engine messages get one added so
/// every non-Info line reads the same way.
pub fn entry_text(entry: &LogEntry) -> String {
    if entry.level == Level::Info || classify(&entry.message) == entry.level {
        entry.message.clone()
    } else {
        format!("{} {}", tag(entry.level), entry.message)
    }
}

/// Render a list as text or JSON. Handles the empty check and format branch.
pub fn handle_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    render_text: impl FnOnce(&[T], &mut dyn Write) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_msg);
            } else {
                render_text(items, &mut std::io::stdout())?;
            }
        }
    }
    Ok(())
}

/// Format-branch helper for single results.
///
/// Renders as JSON when `format` is `Json`, otherwise calls `text_fn`.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}
