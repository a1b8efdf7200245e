// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pf list`

use std::io::Write;

use anyhow::Result;
use clap::Args;
use pf_core::InputRequirement;
use pf_engine::{Registry, RegistryEntry};
use serde::Serialize;

use crate::color;
use crate::output::{handle_list, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Only fixers claiming this symptom (code or diagnostic phrase)
    #[arg(long, value_name = "SYMPTOM")]
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FixerRow {
    pub name: &'static str,
    pub description: &'static str,
    pub codes: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<InputRequirement>,
}

impl From<&RegistryEntry> for FixerRow {
    fn from(entry: &RegistryEntry) -> Self {
        let descriptor = entry.descriptor();
        Self {
            name: descriptor.name,
            description: descriptor.description,
            codes: descriptor.codes,
            input: entry.input_requirement().cloned(),
        }
    }
}

pub fn rows(registry: &Registry, code: Option<&str>) -> Vec<FixerRow> {
    match code {
        Some(code) => registry.by_code(code).into_iter().map(FixerRow::from).collect(),
        None => registry.all().iter().map(FixerRow::from).collect(),
    }
}

pub fn handle(args: ListArgs, registry: &Registry, format: OutputFormat) -> Result<()> {
    let rows = rows(registry, args.code.as_deref());
    let empty = match &args.code {
        Some(code) => format!("No fixer claims `{}`", code),
        None => "No fixers registered".to_string(),
    };
    handle_list(format, &rows, &empty, |rows, out| {
        let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
        for row in rows {
            let pad = " ".repeat(width - row.name.len());
            writeln!(out, "{}{}  {}", color::header(row.name), pad, row.description)?;
            writeln!(out, "{}  {}", " ".repeat(width), color::muted(&row.codes.join(", ")))?;
            if let Some(input) = &row.input {
                let needs = format!("needs input: {} ({})", input.prompt, input.accepted_list());
                writeln!(out, "{}  {}", " ".repeat(width), color::context(&needs))?;
            }
        }
        Ok(())
    })
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
