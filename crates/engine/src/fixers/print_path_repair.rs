// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Cancelled, FixStatus, FixVerdict, FixerDescriptor};

use super::{PrinterResume, QueuePurge, SpoolerReset};
use crate::context::FixContext;
use crate::fixer::Fixer;

static DESCRIPTOR: FixerDescriptor = FixerDescriptor {
    name: "print-path-repair",
    description: "Purge the queue, reset the spooler and resume the printer",
    codes: &["print-failure", "not-printing"],
};

/// Composite repair. Only the spooler reset is essential; the purge and
/// resume steps degrade the verdict to Warning at worst.
pub struct PrintPathRepair;

#[async_trait]
impl Fixer for PrintPathRepair {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &DESCRIPTOR
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        let mut status = FixStatus::Success;

        let purge = ctx.delegate(&QueuePurge).await?;
        if purge.status == FixStatus::Failed {
            ctx.warn("Queue purge failed, continuing with the spooler reset");
        }
        status = status.worst(tolerated(purge.status));

        let reset = ctx.delegate(&SpoolerReset).await?;
        if reset.status == FixStatus::Failed {
            return Ok(ctx.finish(FixStatus::Failed, "Print path still broken: spooler reset failed"));
        }
        status = status.worst(reset.status);

        if ctx.printer().is_some() {
            let resume = ctx.delegate(&PrinterResume).await?;
            status = status.worst(tolerated(resume.status));
        } else {
            ctx.info("No printer selected, skipping printer-resume");
        }

        Ok(match status {
            FixStatus::Success => ctx.finish(status, "Print path repaired"),
            _ => ctx.finish(status, "Print path repaired with warnings"),
        })
    }
}

/// A failed optional step counts as a warning.
fn tolerated(status: FixStatus) -> FixStatus {
    match status {
        FixStatus::Failed => FixStatus::Warning,
        other => other,
    }
}

#[cfg(test)]
#[path = "print_path_repair_tests.rs"]
mod tests;
