// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator-supplied parameters for fixers that cannot run unattended.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Kind of parameter an operator can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    File,
    NetworkShare,
    Automatic,
}

crate::simple_display! {
    InputKind {
        File => "file",
        NetworkShare => "network share",
        Automatic => "automatic",
    }
}

/// A parameter value passed to one fix invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FixInput {
    File(PathBuf),
    NetworkShare(String),
    Automatic,
}

impl FixInput {
    pub fn kind(&self) -> InputKind {
        match self {
            FixInput::File(_) => InputKind::File,
            FixInput::NetworkShare(_) => InputKind::NetworkShare,
            FixInput::Automatic => InputKind::Automatic,
        }
    }

    /// Empty paths count as missing input.
    pub fn is_blank(&self) -> bool {
        match self {
            FixInput::File(path) => path.as_os_str().is_empty(),
            FixInput::NetworkShare(share) => share.trim().is_empty(),
            FixInput::Automatic => false,
        }
    }
}

/// Declared by a fixer that needs a parameter before it can run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputRequirement {
    /// Shown to the operator when asking for the value.
    pub prompt: &'static str,
    pub accepts: &'static [InputKind],
}

impl InputRequirement {
    pub fn accepts(&self, input: &FixInput) -> bool {
        self.accepts.contains(&input.kind())
    }

    /// Human-readable list of accepted kinds, e.g. `file, network share or automatic`.
    pub fn accepted_list(&self) -> String {
        let names: Vec<String> = self.accepts.iter().map(|k| k.to_string()).collect();
        match names.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        }
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
