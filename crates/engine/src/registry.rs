// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only catalog of fixers, built once at startup.

use std::sync::Arc;

use pf_core::{FixerDescriptor, InputRequirement};

use crate::fixer::Fixer;
use crate::fixers;

/// One catalog entry. The input requirement is queried once, here.
#[derive(Clone)]
pub struct RegistryEntry {
    fixer: Arc<dyn Fixer>,
    input: Option<InputRequirement>,
}

impl RegistryEntry {
    fn new(fixer: Arc<dyn Fixer>) -> Self {
        let input = fixer.input_requirement();
        Self { fixer, input }
    }

    pub fn fixer(&self) -> &Arc<dyn Fixer> {
        &self.fixer
    }

    pub fn descriptor(&self) -> &'static FixerDescriptor {
        self.fixer.descriptor()
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn input_requirement(&self) -> Option<&InputRequirement> {
        self.input.as_ref()
    }

    pub fn needs_input(&self) -> bool {
        self.input.is_some()
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name())
            .field("input", &self.input)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new(fixers: Vec<Arc<dyn Fixer>>) -> Self {
        Self { entries: fixers.into_iter().map(RegistryEntry::new).collect() }
    }

    /// The built-in CUPS fixers.
    pub fn builtin() -> Self {
        Self::new(fixers::builtin())
    }

    pub fn all(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Fixers claiming `symptom`, in catalog order.
    ///
    /// See [`FixerDescriptor::applies_to`] for the matching rule.
    pub fn by_code(&self, symptom: &str) -> Vec<&RegistryEntry> {
        self.entries.iter().filter(|e| e.descriptor().applies_to(symptom)).collect()
    }

    pub fn by_name(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
