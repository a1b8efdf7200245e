// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pf-core: data model shared by the printfix engine, backends and CLI

pub mod macros;

pub mod clock;
pub mod descriptor;
pub mod input;
pub mod level;
pub mod log;
pub mod outcome;
pub mod printer;
pub mod script;
pub mod target;
pub mod verdict;

pub use clock::{Clock, FakeClock, SystemClock};
pub use descriptor::FixerDescriptor;
pub use input::{FixInput, InputKind, InputRequirement};
pub use level::{classify, Level};
pub use log::LogEntry;
pub use outcome::{split_lines, Cancelled, ExecutionOutcome};
pub use printer::PrinterContext;
pub use script::{Backend, Script};
pub use target::{Credentials, RemoteHost, Target, TargetParseError};
pub use verdict::{FixStatus, FixVerdict};
