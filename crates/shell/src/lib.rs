// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pf-shell: embedded interpreter for remediation scripts
//!
//! Runs a restricted POSIX `sh` subset in-process: simple commands, `&&`,
//! `||`, `;`, quoting, and `$NAME` expansion. Anything beyond that is reported
//! as unsupported so callers can hand the script to a real shell instead.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod ast;
mod error;
mod lexer;
mod parser;
mod session;
mod span;
mod token;

pub use ast::{
    is_name, AndOrList, Assignment, CommandList, LogicalOp, SimpleCommand, Word, WordPart,
};
pub use error::{ExecError, LexerError, ParseError};
pub use lexer::Lexer;
pub use parser::Parser;
pub use session::Session;
pub use span::Span;
pub use token::{Token, TokenKind};
