// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Cancelled, FixStatus, FixVerdict, FixerDescriptor, Script};

use super::{for_printer, warned};
use crate::context::FixContext;
use crate::fixer::Fixer;

static DESCRIPTOR: FixerDescriptor = FixerDescriptor {
    name: "queue-purge",
    description: "Cancel stuck jobs and confirm the queue is empty",
    codes: &["stuck-job", "queue"],
};

/// An empty `$PF_PRINTER` drops out, so `cancel -a` purges every queue.
const PURGE: &str = "cancel -a $PF_PRINTER && echo '[OK] Pending jobs cancelled'";

const COUNT: &str = r#"remaining=$(lpstat -o $PF_PRINTER 2>/dev/null | wc -l)
if [ "$remaining" -eq 0 ]; then
    echo "[OK] No jobs left in the queue"
else
    echo "[WARN] $remaining job(s) still queued"
fi
"#;

pub struct QueuePurge;

#[async_trait]
impl Fixer for QueuePurge {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &DESCRIPTOR
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        match ctx.printer() {
            Some(printer) => ctx.info(format!("Purging jobs on {}", printer.name)),
            None => ctx.info("No printer selected, purging jobs on every queue"),
        }

        let purge = for_printer(Script::embedded("queue-purge/purge", PURGE), ctx);
        if !ctx.exec(purge).await?.success {
            return Ok(ctx.finish(FixStatus::Failed, "Jobs could not be cancelled"));
        }

        let count = for_printer(Script::external("queue-purge/count", COUNT), ctx);
        let count = ctx.exec_lenient(count).await?;
        if !count.success || warned(&count) {
            return Ok(ctx.finish(FixStatus::Warning, "Jobs cancelled, but the queue is not confirmed empty"));
        }
        Ok(ctx.finish(FixStatus::Success, "Queue purged"))
    }
}

#[cfg(test)]
#[path = "queue_purge_tests.rs"]
mod tests;
