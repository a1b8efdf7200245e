// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{
    Cancelled, FixInput, FixStatus, FixVerdict, FixerDescriptor, InputKind, InputRequirement,
    Script,
};

use super::{for_printer, SpoolerReset};
use crate::context::FixContext;
use crate::fixer::Fixer;

static DESCRIPTOR: FixerDescriptor = FixerDescriptor {
    name: "driver-reinstall",
    description: "Reinstall the printer's PPD driver and restart the scheduler",
    codes: &["driver", "ppd"],
};

const DRIVER_SOURCE: InputRequirement = InputRequirement {
    prompt: "PPD driver source",
    accepts: &[InputKind::File, InputKind::NetworkShare, InputKind::Automatic],
};

const FROM_FILE: &str =
    r#"lpadmin -p $PF_PRINTER -P "$PF_PPD" && echo "[OK] Installed driver from $PF_PPD""#;

const FROM_SHARE: &str = r#"tmp=$(mktemp) || exit 1
trap 'rm -f "$tmp"' EXIT
if ! curl -fsS -o "$tmp" "$PF_PPD"; then
    echo "[ERROR] Could not fetch $PF_PPD"
    exit 1
fi
lpadmin -p "$PF_PRINTER" -P "$tmp" && echo "[OK] Installed driver from $PF_PPD"
"#;

const EVERYWHERE: &str =
    r#"lpadmin -p $PF_PRINTER -m everywhere && echo "[OK] Installed IPP Everywhere driver""#;

pub struct DriverReinstall;

impl DriverReinstall {
    fn install_script(input: &FixInput) -> Script {
        match input {
            FixInput::File(path) => Script::embedded("driver-reinstall/install", FROM_FILE)
                .var("PF_PPD", path.display().to_string()),
            FixInput::NetworkShare(share) => {
                Script::external("driver-reinstall/install", FROM_SHARE).var("PF_PPD", share.as_str())
            }
            FixInput::Automatic => Script::embedded("driver-reinstall/install", EVERYWHERE),
        }
    }
}

#[async_trait]
impl Fixer for DriverReinstall {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &DESCRIPTOR
    }

    fn input_requirement(&self) -> Option<InputRequirement> {
        Some(DRIVER_SOURCE)
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        let Some(printer) = ctx.printer() else {
            ctx.info("No printer selected, no driver to install");
            return Ok(ctx.finish(FixStatus::Warning, "driver-reinstall needs a printer"));
        };
        let Some(input) = ctx.input() else {
            return Ok(ctx.finish(FixStatus::Warning, "No driver source given"));
        };

        ctx.info(format!("Installing {} driver for {}", input.kind(), printer.name));
        let install = for_printer(Self::install_script(input), ctx);
        if !ctx.exec(install).await?.success {
            return Ok(ctx.finish(FixStatus::Failed, "Driver installation failed"));
        }

        let reset = ctx.delegate(&SpoolerReset).await?;
        Ok(match reset.status {
            FixStatus::Success => ctx.finish(FixStatus::Success, "Driver reinstalled"),
            FixStatus::Warning => {
                ctx.finish(FixStatus::Warning, "Driver reinstalled, spooler reset had warnings")
            }
            FixStatus::Failed => {
                ctx.finish(FixStatus::Failed, "Driver reinstalled, but the scheduler is down")
            }
        })
    }
}

#[cfg(test)]
#[path = "driver_reinstall_tests.rs"]
mod tests;
