// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-adapters: execution backends for remediation scripts

pub mod env;
pub mod runner;
pub mod subprocess;

pub use env::RunnerConfig;
pub use runner::{
    shell_quote, BackendRouter, EmbeddedError, EmbeddedRunner, ExternalRunner, RemoteRunner,
    Route, ScriptRunner,
};
pub use subprocess::{run_with_timeout, SubprocessError};

#[cfg(any(test, feature = "test-support"))]
pub use runner::{FakeRunner, RunnerCall};
