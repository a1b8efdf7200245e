// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use pf_core::{Cancelled, FixStatus, FixVerdict, FixerDescriptor, Script};

use super::warned;
use crate::context::FixContext;
use crate::fixer::Fixer;

static DESCRIPTOR: FixerDescriptor = FixerDescriptor {
    name: "sharing-firewall",
    description: "Enable printer sharing and open the IPP port in the host firewall",
    codes: &["firewall", "ipp-blocked", "sharing"],
};

const SHARE: &str = "cupsctl --share-printers && echo '[OK] Printer sharing enabled'";

const OPEN_IPP: &str = r#"if command -v ufw >/dev/null 2>&1; then
    ufw allow 631/tcp >/dev/null && echo "[OK] ufw allows IPP on port 631"
elif command -v firewall-cmd >/dev/null 2>&1; then
    firewall-cmd --permanent --add-service=ipp >/dev/null &&
        firewall-cmd --reload >/dev/null &&
        echo "[OK] firewalld allows IPP on port 631"
else
    echo "[WARN] No ufw or firewalld found, port 631 left unchanged"
fi
"#;

pub struct SharingFirewall;

#[async_trait]
impl Fixer for SharingFirewall {
    fn descriptor(&self) -> &'static FixerDescriptor {
        &DESCRIPTOR
    }

    async fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixVerdict, Cancelled> {
        let mut status = FixStatus::Success;

        // The port can still be opened when sharing is managed elsewhere.
        if !ctx.exec_lenient(Script::embedded("sharing-firewall/share", SHARE)).await?.success {
            status = FixStatus::Warning;
        }

        let open = ctx.exec(Script::external("sharing-firewall/open-ipp", OPEN_IPP)).await?;
        if !open.success {
            return Ok(ctx.finish(FixStatus::Failed, "IPP port could not be opened"));
        }
        if warned(&open) {
            status = FixStatus::Warning;
        }

        Ok(match status {
            FixStatus::Success => ctx.finish(status, "Sharing enabled and IPP reachable"),
            _ => ctx.finish(status, "Sharing partially configured"),
        })
    }
}

#[cfg(test)]
#[path = "sharing_firewall_tests.rs"]
mod tests;
