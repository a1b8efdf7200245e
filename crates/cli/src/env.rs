// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot resolve a state directory: set PF_STATE_DIR or HOME")]
    NoStateDir,
}

/// Resolve state directory: PF_STATE_DIR > XDG_STATE_HOME/printfix > platform state dir
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = non_empty("PF_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("printfix"));
    }
    if let Some(dir) = dirs::state_dir() {
        return Ok(dir.join("printfix"));
    }
    dirs::home_dir().map(|home| home.join(".local/state/printfix")).ok_or(ConfigError::NoStateDir)
}

/// Tracing filter directives (default `warn`, `PF_LOG`).
pub fn log_filter() -> String {
    non_empty("PF_LOG").unwrap_or_else(|| "warn".to_string())
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
