// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Read-only description of the print queue being repaired.
///
/// Supplied by the caller's discovery layer; the engine never looks printers up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrinterContext {
    /// CUPS queue name.
    pub name: String,
    /// Device URI or network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Status text as last reported by the scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl PrinterContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    crate::setters! {
        option {
            address: String,
            driver: String,
            status: String,
        }
    }
}
