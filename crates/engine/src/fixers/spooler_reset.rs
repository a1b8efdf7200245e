// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Cancelled, FixStatus, FixVerdict, FixerDescriptor, Script};

use super::SPOOL_DIR;
use crate::context::FixContext;
use crate::fixer::Fixer;

static DESCRIPTOR: FixerDescriptor = FixerDescriptor {
    name: "spooler-reset",
    description: "Stop the CUPS scheduler, clear stale spool files and start it again",
    codes: &["spooler", "scheduler", "queue-stuck"],
};

const STOP: &str = "systemctl stop cups && echo '[OK] CUPS scheduler stopped'";

// Globs and arithmetic need a real shell.
const CLEAR: &str = r#"count=0
for f in "$PF_SPOOL_DIR"/c* "$PF_SPOOL_DIR"/d*; do
    [ -e "$f" ] || continue
    rm -f "$f" && count=$((count + 1))
done
echo "[OK] Removed $count spool file(s)"
"#;

const START: &str = "systemctl start cups && echo '[OK] CUPS scheduler started'";

/// Bounce the scheduler with an empty spool directory.
pub struct SpoolerReset;

#[async_trait]
impl Fixer for SpoolerReset {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &DESCRIPTOR
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        let mut status = FixStatus::Success;

        let stop = ctx.exec_lenient(Script::embedded("spooler-reset/stop", STOP)).await?;
        if stop.success {
            let clear = Script::external("spooler-reset/clear", CLEAR).var("PF_SPOOL_DIR", SPOOL_DIR);
            if !ctx.exec_lenient(clear).await?.success {
                status = FixStatus::Warning;
            }
        } else {
            // Deleting spool files under a live scheduler corrupts its queue.
            ctx.warn("Spool files left in place because the scheduler did not stop");
            status = FixStatus::Warning;
        }

        let start = ctx.exec(Script::embedded("spooler-reset/start", START)).await?;
        if !start.success {
            return Ok(ctx.finish(FixStatus::Failed, "CUPS scheduler could not be started"));
        }

        Ok(match status {
            FixStatus::Success => ctx.finish(status, "Spooler reset complete"),
            _ => ctx.finish(status, "Scheduler restarted, but the spool was not fully cleared"),
        })
    }
}

#[cfg(test)]
#[path = "spooler_reset_tests.rs"]
mod tests;
