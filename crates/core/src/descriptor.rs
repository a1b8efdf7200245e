// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

/// Static identity of a fixer: built once, shared across invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixerDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// Symptom codes this fixer claims.
    pub codes: &'static [&'static str],
}

impl FixerDescriptor {
    /// Whether this fixer claims the given symptom.
    ///
    /// A code matches when it is contained in the symptom, ignoring case, so
    /// callers can pass either a bare code or a longer diagnostic phrase.
    pub fn applies_to(&self, symptom: &str) -> bool {
        let symptom = symptom.to_lowercase();
        self.codes.iter().any(|code| symptom.contains(&code.to_lowercase()))
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
