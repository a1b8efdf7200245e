// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parser that turns session tokens into a command list.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};

/// Words that open or close compound commands in a full shell.
const RESERVED: &[&str] = &[
    "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case", "esac",
    "function", "select",
];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    /// Parse input string into a command list, or error on invalid or
    /// unsupported syntax.
    pub fn parse(input: &str) -> Result<CommandList, ParseError> {
        let tokens = Lexer::tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0, input_len: input.len() };
        parser.parse_command_list()
    }

    /// Grammar: and_or_list ((';' | '\n') and_or_list)*
    fn parse_command_list(&mut self) -> Result<CommandList, ParseError> {
        let start = self.current_span_start();
        let mut commands = Vec::new();

        self.skip_separators();
        while !self.at_end() {
            commands.push(self.parse_and_or_list()?);
            if !self.at_end() && !self.at_separator() {
                return Err(self.unexpected_token("';' or newline"));
            }
            self.skip_separators();
        }

        let end = self.current_span_end();
        Ok(CommandList { commands, span: Span::new(start, end.max(start)) })
    }

    /// Grammar: simple_command (('&&' | '||') newline* simple_command)*
    ///
    /// AND/OR have equal precedence, left-associative.
    fn parse_and_or_list(&mut self) -> Result<AndOrList, ParseError> {
        let first = self.parse_simple_command()?;
        let start_span = first.span;
        let mut rest = Vec::new();

        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::And) => LogicalOp::And,
                Some(TokenKind::Or) => LogicalOp::Or,
                _ => break,
            };
            self.advance();
            while matches!(self.peek_kind(), Some(TokenKind::Newline)) {
                self.advance();
            }
            rest.push((op, self.parse_simple_command()?));
        }

        let end_span = rest.last().map(|(_, cmd)| cmd.span).unwrap_or(start_span);
        Ok(AndOrList { first, rest, span: start_span.merge(end_span) })
    }

    /// Grammar: assignment* (word word*)?
    ///
    /// Words matching NAME=VALUE before the command name are assignments.
    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        self.reject_unsupported()?;

        let start = self.current_span_start();
        let mut env = Vec::new();
        let mut name: Option<Word> = None;
        let mut args = Vec::new();

        while let Some(Token { kind: TokenKind::Word(parts), span }) = self.peek() {
            let word = Word { parts: parts.clone(), span: *span };
            self.advance();
            if name.is_none() {
                if let Some(assignment) = word.as_assignment() {
                    env.push(assignment);
                    continue;
                }
                if let Some(keyword) = word.as_literal().filter(|w| RESERVED.contains(w)) {
                    return Err(ParseError::Unsupported {
                        feature: format!("compound command `{}`", keyword),
                        span: word.span,
                    });
                }
                if word.as_literal() == Some("!") {
                    return Err(ParseError::Unsupported {
                        feature: "negation".to_string(),
                        span: word.span,
                    });
                }
                name = Some(word);
            } else {
                args.push(word);
            }
        }

        self.reject_unsupported()?;

        if env.is_empty() && name.is_none() {
            return Err(self.unexpected_token("command"));
        }

        let end = self.current_span_end();
        Ok(SimpleCommand { env, name, args, span: Span::new(start, end.max(start)) })
    }

    fn reject_unsupported(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(Token { kind: TokenKind::Unsupported(feature), span }) => {
                Err(ParseError::Unsupported { feature: feature.to_string(), span: *span })
            }
            _ => Ok(()),
        }
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    #[inline]
    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    #[inline]
    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    fn at_separator(&self) -> bool {
        matches!(self.peek_kind(), Some(TokenKind::Semi | TokenKind::Newline))
    }

    fn skip_separators(&mut self) {
        while self.at_separator() {
            self.advance();
        }
    }

    fn current_span_start(&self) -> usize {
        self.peek().map(|t| t.span.start).unwrap_or(self.input_len)
    }

    fn current_span_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end,
            None if self.tokens.is_empty() => self.input_len,
            None => 0,
        }
    }

    fn unexpected_token(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                found: token.kind.clone(),
                expected: expected.to_string(),
                span: token.span,
            },
            None => ParseError::UnexpectedEof { expected: expected.to_string() },
        }
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
