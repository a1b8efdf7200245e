// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Syntax tree for the restricted shell subset the session runs.

use crate::span::Span;

/// Statements separated by `;` or newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandList {
    pub commands: Vec<AndOrList>,
    pub span: Span,
}

/// A chain of commands connected by `&&` or `||`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AndOrList {
    pub first: SimpleCommand,
    pub rest: Vec<(LogicalOp, SimpleCommand)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&` - run next if previous succeeded
    And,
    /// `||` - run next if previous failed
    Or,
}

/// `NAME=value ... name arg ...`; either side may be empty, not both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCommand {
    pub env: Vec<Assignment>,
    pub name: Option<Word>,
    pub args: Vec<Word>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub value: Word,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub parts: Vec<WordPart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted text.
    Literal(String),
    /// Text from quotes or a backslash escape.
    Quoted(String),
    /// `$NAME` or `${NAME}`
    Variable(String),
    /// `$?`
    LastStatus,
}

impl Word {
    /// The text of a word made of a single unquoted literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [WordPart::Literal(s)] => Some(s),
            _ => None,
        }
    }

    /// True when the word has only expansions, so an empty result drops it.
    pub fn is_bare_expansion(&self) -> bool {
        self.parts.iter().all(|p| matches!(p, WordPart::Variable(_) | WordPart::LastStatus))
    }

    /// Split `NAME=value` when the word starts with an unquoted valid name and `=`.
    pub fn as_assignment(&self) -> Option<Assignment> {
        let Some(WordPart::Literal(first)) = self.parts.first() else {
            return None;
        };
        let (name, rest) = first.split_once('=')?;
        if !is_name(name) {
            return None;
        }
        let mut parts = Vec::with_capacity(self.parts.len());
        if !rest.is_empty() {
            parts.push(WordPart::Literal(rest.to_string()));
        }
        parts.extend(self.parts[1..].iter().cloned());
        Some(Assignment {
            name: name.to_string(),
            value: Word { parts, span: self.span },
            span: self.span,
        })
    }
}

/// Valid variable name: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
