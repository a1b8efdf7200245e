// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer, parser and execution errors.

use crate::span::Span;
use crate::token::TokenKind;
use thiserror::Error;

/// Errors that can occur during lexing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("unterminated single quote at position {}", span.start)]
    UnterminatedSingleQuote { span: Span },

    #[error("unterminated double quote at position {}", span.start)]
    UnterminatedDoubleQuote { span: Span },

    /// `${` without the closing brace.
    #[error("unterminated variable at position {}", span.start)]
    UnterminatedVariable { span: Span },

    #[error("invalid variable name '{name}' at position {}", span.start)]
    InvalidVariableName { name: String, span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnterminatedSingleQuote { span }
            | LexerError::UnterminatedDoubleQuote { span }
            | LexerError::UnterminatedVariable { span }
            | LexerError::InvalidVariableName { span, .. } => *span,
        }
    }
}

/// Parser errors for session script syntax.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("unexpected token {found} at position {}, expected {expected}", span.start)]
    UnexpectedToken { found: TokenKind, expected: String, span: Span },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// Valid shell, but outside what the embedded session runs.
    #[error("{feature} is not supported at position {}", span.start)]
    Unsupported { feature: String, span: Span },
}

/// Errors that can occur while a session runs a script.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A command list ended non-zero (fail-fast).
    #[error("command `{command}` failed with exit code {exit_code}")]
    CommandFailed { command: String, exit_code: i32, span: Span },

    /// The command exists but could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    SpawnFailed { command: String, source: std::io::Error, span: Span },

    /// The script uses shell features the session does not provide.
    #[error("unsupported in embedded session: {feature}")]
    Unsupported { feature: String, span: Span },

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Parse(ParseError),
}

impl ExecError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ExecError::Unsupported { .. })
    }
}

impl From<ParseError> for ExecError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Unsupported { feature, span } => ExecError::Unsupported { feature, span },
            other => ExecError::Parse(other),
        }
    }
}
