// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Cancelled, FixStatus, FixVerdict, FixerDescriptor, Script};

use super::for_printer;
use crate::context::FixContext;
use crate::fixer::Fixer;

static DESCRIPTOR: FixerDescriptor = FixerDescriptor {
    name: "printer-resume",
    description: "Re-enable a paused printer and let it accept jobs again",
    codes: &["paused", "disabled", "rejecting"],
};

const ENABLE: &str = r#"cupsenable $PF_PRINTER && echo "[OK] $PF_PRINTER enabled""#;
const ACCEPT: &str = r#"cupsaccept $PF_PRINTER && echo "[OK] $PF_PRINTER accepting jobs""#;

pub struct PrinterResume;

#[async_trait]
impl Fixer for PrinterResume {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &DESCRIPTOR
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        if ctx.printer().is_none() {
            ctx.info("No printer selected, nothing to resume");
            return Ok(ctx.finish(FixStatus::Warning, "printer-resume needs a printer"));
        }

        let enable = for_printer(Script::embedded("printer-resume/enable", ENABLE), ctx);
        if !ctx.exec(enable).await?.success {
            return Ok(ctx.finish(FixStatus::Failed, "Printer could not be enabled"));
        }

        let accept = for_printer(Script::embedded("printer-resume/accept", ACCEPT), ctx);
        if !ctx.exec_lenient(accept).await?.success {
            return Ok(ctx.finish(FixStatus::Warning, "Printer enabled, but it still rejects jobs"));
        }
        Ok(ctx.finish(FixStatus::Success, "Printer resumed"))
    }
}

#[cfg(test)]
#[path = "printer_resume_tests.rs"]
mod tests;
