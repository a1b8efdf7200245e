// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token types for the session lexer.

use std::fmt;

use crate::ast::WordPart;
pub use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A complete word: adjacent quoted, unquoted and variable parts.
    Word(Vec<WordPart>),
    /// `&&`
    And,
    /// `||`
    Or,
    /// `;`
    Semi,
    Newline,
    /// Shell syntax the session recognizes but does not run.
    Unsupported(&'static str),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(_) => f.write_str("word"),
            TokenKind::And => f.write_str("'&&'"),
            TokenKind::Or => f.write_str("'||'"),
            TokenKind::Semi => f.write_str("';'"),
            TokenKind::Newline => f.write_str("newline"),
            TokenKind::Unsupported(feature) => write!(f, "{}", feature),
        }
    }
}
