// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexer for the session's shell subset.
//!
//! Constructs outside the subset become a single `Unsupported` token and stop
//! the scan, so the parser reports them instead of whatever follows.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::ast::{is_name, WordPart};
use crate::error::LexerError;
use crate::token::{Span, Token, TokenKind};

const GLOB: &str = "glob pattern";
const SUBSTITUTION: &str = "command substitution";

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

/// Accumulates the parts of one word, merging adjacent text of the same kind.
#[derive(Default)]
struct WordBuf {
    parts: Vec<WordPart>,
}

impl WordBuf {
    fn literal(&mut self, ch: char) {
        match self.parts.last_mut() {
            Some(WordPart::Literal(s)) => s.push(ch),
            _ => self.parts.push(WordPart::Literal(ch.to_string())),
        }
    }

    fn quoted(&mut self, text: &str) {
        match self.parts.last_mut() {
            Some(WordPart::Quoted(s)) => s.push_str(text),
            _ => self.parts.push(WordPart::Quoted(text.to_string())),
        }
    }

    fn push(&mut self, part: WordPart) {
        self.parts.push(part);
    }
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, chars: input.char_indices().peekable() }
    }

    /// Tokenize the input, stopping after the first unsupported construct.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexerError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::with_capacity(input.len() / 4 + 1);
        while let Some(token) = lexer.next_token()? {
            let stop = matches!(token.kind, TokenKind::Unsupported(_));
            tokens.push(token);
            if stop {
                break;
            }
        }
        Ok(tokens)
    }

    #[inline]
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Character after the next one.
    fn peek_second(&self) -> Option<char> {
        let mut lookahead = self.chars.clone();
        lookahead.next();
        lookahead.peek().map(|(_, c)| *c)
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map(|(pos, _)| *pos).unwrap_or(self.input.len())
    }

    /// Backslash-newline joins lines.
    fn consume_line_continuation(&mut self) -> bool {
        if self.peek_char() != Some('\\') {
            return false;
        }
        match self.peek_second() {
            Some('\n') => {
                self.chars.next();
                self.chars.next();
                true
            }
            _ => false,
        }
    }

    fn skip_blanks(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t') => {
                    self.chars.next();
                }
                Some('\\') if self.consume_line_continuation() => {}
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.chars.next();
        }
    }

    fn single(&mut self, pos: usize, kind: TokenKind) -> Token {
        self.chars.next();
        Token::new(kind, Span::new(pos, pos + 1))
    }

    fn unsupported(&mut self, pos: usize, feature: &'static str) -> Token {
        let end = self.position().max(pos + 1).min(self.input.len());
        Token::new(TokenKind::Unsupported(feature), Span::new(pos, end))
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexerError> {
        loop {
            self.skip_blanks();
            let Some(&(pos, ch)) = self.chars.peek() else {
                return Ok(None);
            };

            let token = match ch {
                '#' => {
                    self.skip_comment();
                    continue;
                }
                '\n' => self.single(pos, TokenKind::Newline),
                '\r' => {
                    self.chars.next();
                    let end = if self.peek_char() == Some('\n') {
                        self.chars.next();
                        pos + 2
                    } else {
                        pos + 1
                    };
                    Token::new(TokenKind::Newline, Span::new(pos, end))
                }
                ';' => self.single(pos, TokenKind::Semi),
                '&' if self.peek_second() == Some('&') => {
                    self.chars.next();
                    self.chars.next();
                    Token::new(TokenKind::And, Span::new(pos, pos + 2))
                }
                '|' if self.peek_second() == Some('|') => {
                    self.chars.next();
                    self.chars.next();
                    Token::new(TokenKind::Or, Span::new(pos, pos + 2))
                }
                '&' => self.unsupported(pos, "background execution"),
                '|' => self.unsupported(pos, "pipeline"),
                '<' | '>' => self.unsupported(pos, "redirection"),
                '(' | ')' => self.unsupported(pos, "subshell"),
                '`' => self.unsupported(pos, SUBSTITUTION),
                _ => self.lex_word(pos)?,
            };
            return Ok(Some(token));
        }
    }

    #[inline]
    fn is_word_boundary(ch: char) -> bool {
        matches!(
            ch,
            ' ' | '\t' | '\n' | '\r' | ';' | '&' | '|' | '<' | '>' | '(' | ')' | '`'
        )
    }

    fn lex_word(&mut self, start: usize) -> Result<Token, LexerError> {
        let mut word = WordBuf::default();

        while let Some(&(pos, ch)) = self.chars.peek() {
            if self.consume_line_continuation() {
                continue;
            }
            if Self::is_word_boundary(ch) {
                break;
            }
            match ch {
                '\\' => {
                    self.chars.next();
                    match self.chars.next() {
                        Some((_, escaped)) => word.quoted(escaped.encode_utf8(&mut [0; 4])),
                        None => word.literal('\\'),
                    }
                }
                '\'' => {
                    let text = self.lex_single_quote(pos)?;
                    word.quoted(&text);
                }
                '"' => {
                    if let Some(feature) = self.lex_double_quote(pos, &mut word)? {
                        return Ok(self.unsupported(pos, feature));
                    }
                }
                '$' => match self.lex_dollar(pos)? {
                    Dollar::Part(part) => word.push(part),
                    Dollar::Literal => word.literal('$'),
                    Dollar::Unsupported(feature) => return Ok(self.unsupported(pos, feature)),
                },
                '*' | '?' | '[' => return Ok(self.unsupported(pos, GLOB)),
                '{' | '}' => return Ok(self.unsupported(pos, "brace group")),
                _ => {
                    self.chars.next();
                    word.literal(ch);
                }
            }
        }

        let end = self.position();
        Ok(Token::new(TokenKind::Word(word.parts), Span::new(start, end)))
    }

    fn lex_single_quote(&mut self, start: usize) -> Result<String, LexerError> {
        self.chars.next();
        let mut text = String::new();
        for (_, ch) in self.chars.by_ref() {
            if ch == '\'' {
                return Ok(text);
            }
            text.push(ch);
        }
        Err(LexerError::UnterminatedSingleQuote { span: Span::new(start, self.input.len()) })
    }

    /// Lex `"..."` into `word`. Returns the feature name if the quote holds
    /// something the session does not run.
    fn lex_double_quote(
        &mut self,
        start: usize,
        word: &mut WordBuf,
    ) -> Result<Option<&'static str>, LexerError> {
        self.chars.next();
        let mut text = String::new();

        while let Some(&(pos, ch)) = self.chars.peek() {
            match ch {
                '"' => {
                    self.chars.next();
                    word.quoted(&text);
                    return Ok(None);
                }
                '\\' => {
                    self.chars.next();
                    match self.peek_char() {
                        Some('\n') => {
                            self.chars.next();
                        }
                        Some(esc @ ('$' | '"' | '\\' | '`')) => {
                            self.chars.next();
                            text.push(esc);
                        }
                        _ => text.push('\\'),
                    }
                }
                '`' => return Ok(Some(SUBSTITUTION)),
                '$' => match self.lex_dollar(pos)? {
                    Dollar::Part(part) => {
                        word.quoted(&std::mem::take(&mut text));
                        word.push(part);
                    }
                    Dollar::Literal => text.push('$'),
                    Dollar::Unsupported(feature) => return Ok(Some(feature)),
                },
                _ => {
                    self.chars.next();
                    text.push(ch);
                }
            }
        }
        Err(LexerError::UnterminatedDoubleQuote { span: Span::new(start, self.input.len()) })
    }

    fn lex_dollar(&mut self, start: usize) -> Result<Dollar, LexerError> {
        self.chars.next();
        match self.peek_char() {
            Some('(') => Ok(Dollar::Unsupported(SUBSTITUTION)),
            Some('?') => {
                self.chars.next();
                Ok(Dollar::Part(WordPart::LastStatus))
            }
            Some('{') => {
                self.chars.next();
                let mut name = String::new();
                for (pos, ch) in self.chars.by_ref() {
                    if ch == '}' {
                        if is_name(&name) {
                            return Ok(Dollar::Part(WordPart::Variable(name)));
                        }
                        if name.contains([':', '#', '%', '/', '-', '=', '+']) {
                            return Ok(Dollar::Unsupported("parameter expansion modifier"));
                        }
                        return Err(LexerError::InvalidVariableName {
                            name,
                            span: Span::new(start, pos + 1),
                        });
                    }
                    name.push(ch);
                }
                Err(LexerError::UnterminatedVariable { span: Span::new(start, self.input.len()) })
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(c) = self.peek_char() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    self.chars.next();
                }
                Ok(Dollar::Part(WordPart::Variable(name)))
            }
            _ => Ok(Dollar::Literal),
        }
    }
}

enum Dollar {
    Part(WordPart),
    Literal,
    Unsupported(&'static str),
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
