// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in CUPS fixers.
//!
//! Step scripts are named `<fixer>/<step>` and see the selected queue as
//! `$PF_PRINTER` (empty when none is selected).

mod driver_reinstall;
mod print_path_repair;
mod printer_resume;
mod queue_purge;
mod sharing_firewall;
mod spooler_reset;

use std::sync::Arc;

use pf_core::{classify, ExecutionOutcome, Level, Script};

use crate::context::FixContext;
use crate::fixer::Fixer;

pub use driver_reinstall::DriverReinstall;
pub use print_path_repair::PrintPathRepair;
pub use printer_resume::PrinterResume;
pub use queue_purge::QueuePurge;
pub use sharing_firewall::SharingFirewall;
pub use spooler_reset::SpoolerReset;

/// CUPS keeps control (`c*`) and data (`d*`) files here.
pub const SPOOL_DIR: &str = "/var/spool/cups";

/// Every built-in fixer, in listing order.
pub fn builtin() -> Vec<Arc<dyn Fixer>> {
    vec![
        Arc::new(SpoolerReset),
        Arc::new(QueuePurge),
        Arc::new(PrinterResume),
        Arc::new(SharingFirewall),
        Arc::new(DriverReinstall),
        Arc::new(PrintPathRepair),
    ]
}

/// Bind the selected queue name to `$PF_PRINTER`.
fn for_printer(script: Script, ctx: &FixContext<'_>) -> Script {
    let name = ctx.printer().map(|p| p.name.as_str()).unwrap_or_default();
    script.var("PF_PRINTER", name)
}

/// Whether a step printed a `[WARN]` line.
fn warned(outcome: &ExecutionOutcome) -> bool {
    outcome.output.iter().any(|line| classify(line) == Level::Warning)
}

#[cfg(test)]
mod test_helpers;
