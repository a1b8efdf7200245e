// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-engine: fixers, their execution context and the `apply` boundary

mod context;
mod engine;
mod fixer;
pub mod fixers;
mod guard;
mod registry;
mod sink;

pub use context::FixContext;
pub use engine::Engine;
pub use fixer::{FixRequest, Fixer};
pub use guard::{TargetGuard, TargetLease};
pub use registry::{Registry, RegistryEntry};
pub use sink::{NullSink, ProgressSink};
