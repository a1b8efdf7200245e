// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fixer capability set and per-invocation request.

use async_trait::async_trait;
use pf_core::{
    Cancelled, FixInput, FixVerdict, FixerDescriptor, InputRequirement, PrinterContext, Target,
};

use crate::context::FixContext;

/// A named, ordered remediation procedure.
///
/// Fixers hold no invocation state: everything a run needs arrives through
/// the [`FixContext`].
#[async_trait]
pub trait Fixer: Send + Sync {
    fn descriptor(&self) -> &'static FixerDescriptor;

    /// Operator input this fixer needs before it can run.
    fn input_requirement(&self) -> Option<InputRequirement> {
        None
    }

    /// Run the steps in order. Return `Err(Cancelled)` once the context
    /// reports cancellation; the caller turns it into a verdict.
    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled>;
}

/// Everything the caller decides for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixRequest {
    /// The queue under repair, when the caller selected one.
    pub printer: Option<PrinterContext>,
    pub target: Target,
    pub input: Option<FixInput>,
}

impl FixRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pf_core::setters! {
        set {
            target: Target,
        }
        option {
            printer: PrinterContext,
            input: FixInput,
        }
    }
}

/// Why a fixer cannot start with the given input, if it cannot.
pub(crate) fn input_problem(
    requirement: Option<&InputRequirement>,
    input: Option<&FixInput>,
) -> Option<String> {
    let requirement = requirement?;
    match input {
        None => Some(format!(
            "missing required input: {} ({})",
            requirement.prompt,
            requirement.accepted_list()
        )),
        Some(input) if input.is_blank() => {
            Some(format!("missing required input: {} is empty", input.kind()))
        }
        Some(input) if !requirement.accepts(input) => Some(format!(
            "unsupported input: {} (expected {})",
            input.kind(),
            requirement.accepted_list()
        )),
        Some(_) => None,
    }
}

#[cfg(test)]
#[path = "fixer_tests.rs"]
mod tests;
