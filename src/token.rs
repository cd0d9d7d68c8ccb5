// This file is part of aexpr, an infix expression parser and evaluator.
// Copyright (C) 2026 aexpr contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Tokenizer: turns a cursor into the source string into a stream of
//! [`Token`]s, one at a time.
//!
//! The tokenizer does not decide whether an operand or an operator is
//! expected next — that state belongs to the tree builder, which passes it
//! in on every call so a lone `-` can be classified as [`TokenKind::Neg`] or
//! [`TokenKind::Minus`] without the tokenizer reaching into the tree.

use std::ops::Range;

use crate::ast::{Payload, TokenKind};
use crate::error::BuildError;
use crate::value::{DataType, Syntax, Value};

/// One recognised token together with the byte range it occupies in the
/// source expression.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: Payload,
    pub range: Range<usize>,
}

/// Cursor-based lexer over one expression string.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    data_type: DataType,
    syntax: Syntax,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str, data_type: DataType, syntax: Syntax) -> Self {
        Tokenizer {
            source,
            pos: 0,
            data_type,
            syntax,
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Reads the next token. `expect_operand` is `true` when the builder is
    /// waiting for a value-like token (so a `-` is unary negation) and
    /// `false` when it is waiting for an operator (so `-` is subtraction).
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn next(&mut self, expect_operand: bool) -> Result<Option<Token>, BuildError> {
        self.skip_whitespace();
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        if c.is_ascii_digit() || (self.data_type == DataType::Double && self.starts_double(c)) {
            return self.lex_number(start).map(Some);
        }

        if c == self.syntax.var_flag {
            return self.lex_variable(start).map(Some);
        }

        if self.rest().starts_with("sqrt(") {
            self.pos += "sqrt(".len();
            return Ok(Some(Token {
                kind: TokenKind::Sqrt,
                payload: Payload::None,
                range: start..self.pos,
            }));
        }
        if self.rest().starts_with("ln(") {
            self.pos += "ln(".len();
            return Ok(Some(Token {
                kind: TokenKind::Ln,
                payload: Payload::None,
                range: start..self.pos,
            }));
        }
        if self.rest().starts_with("log(") {
            self.pos += "log(".len();
            return Ok(Some(Token {
                kind: TokenKind::Log,
                payload: Payload::None,
                range: start..self.pos,
            }));
        }

        if c.is_alphabetic() {
            // Any other bare identifier (including `sqrt`/`ln`/`log` not
            // followed by `(`) has no meaning in this grammar.
            self.bump();
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.bump();
            }
            return Err(BuildError::UnrecognisedToken {
                at: start..self.pos,
            });
        }

        let kind = match c {
            '+' => {
                self.bump();
                TokenKind::Plus
            }
            '-' => {
                self.bump();
                if expect_operand {
                    TokenKind::Neg
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                self.bump();
                TokenKind::Mul
            }
            '/' => {
                self.bump();
                TokenKind::Div
            }
            '^' => {
                self.bump();
                TokenKind::Pow
            }
            '(' => {
                self.bump();
                TokenKind::ParenLeft
            }
            ')' => {
                self.bump();
                TokenKind::ParenRight
            }
            '&' => {
                self.bump();
                if self.peek() == Some('&') {
                    self.bump();
                    TokenKind::And
                } else {
                    return Err(BuildError::UnrecognisedToken {
                        at: start..self.pos,
                    });
                }
            }
            '|' => {
                self.bump();
                if self.peek() == Some('|') {
                    self.bump();
                    TokenKind::Or
                } else {
                    return Err(BuildError::UnrecognisedToken {
                        at: start..self.pos,
                    });
                }
            }
            '=' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Eq
                } else {
                    return Err(BuildError::UnrecognisedToken {
                        at: start..self.pos,
                    });
                }
            }
            '!' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Neq
                } else {
                    TokenKind::Not
                }
            }
            '>' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '<' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            _ => {
                self.bump();
                return Err(BuildError::UnrecognisedToken {
                    at: start..self.pos,
                });
            }
        };

        Ok(Some(Token {
            kind,
            payload: Payload::None,
            range: start..self.pos,
        }))
    }

    fn starts_double(&self, c: char) -> bool {
        if c == '.' {
            return true;
        }
        let rest = self.rest();
        rest.len() >= 3
            && (rest[..3].eq_ignore_ascii_case("inf") || rest[..3].eq_ignore_ascii_case("nan"))
    }

    fn lex_number(&mut self, start: usize) -> Result<Token, BuildError> {
        match self.data_type {
            DataType::Long => {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                if self.pos == start {
                    return Err(BuildError::InvalidNumericConstant {
                        at: start..self.pos + 1,
                    });
                }
                let text = &self.source[start..self.pos];
                let n = text.parse::<i64>().map_err(|_| {
                    BuildError::InvalidNumericConstant {
                        at: start..self.pos,
                    }
                })?;
                Ok(Token {
                    kind: TokenKind::Num,
                    payload: Payload::Num(Value::Long(n)),
                    range: start..self.pos,
                })
            }
            DataType::Double => {
                let rest = self.rest();
                if rest.len() >= 3 && rest[..3].eq_ignore_ascii_case("nan") {
                    self.pos += 3;
                    return Ok(Token {
                        kind: TokenKind::Num,
                        payload: Payload::Num(Value::Double(f64::NAN)),
                        range: start..self.pos,
                    });
                }
                if rest.len() >= 3 && rest[..3].eq_ignore_ascii_case("inf") {
                    self.pos += 3;
                    if self.rest().len() >= 5 && self.rest()[..5].eq_ignore_ascii_case("inity") {
                        self.pos += 5;
                    }
                    return Ok(Token {
                        kind: TokenKind::Num,
                        payload: Payload::Num(Value::Double(f64::INFINITY)),
                        range: start..self.pos,
                    });
                }

                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                if self.peek() == Some('.') {
                    self.bump();
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                }
                if matches!(self.peek(), Some('e') | Some('E')) {
                    let mark = self.pos;
                    self.bump();
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.bump();
                    }
                    if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                            self.bump();
                        }
                    } else {
                        // Not actually an exponent; back off.
                        self.pos = mark;
                    }
                }
                if self.pos == start {
                    return Err(BuildError::InvalidNumericConstant {
                        at: start..start + 1,
                    });
                }
                let text = &self.source[start..self.pos];
                let n = text.parse::<f64>().map_err(|_| {
                    BuildError::InvalidNumericConstant {
                        at: start..self.pos,
                    }
                })?;
                Ok(Token {
                    kind: TokenKind::Num,
                    payload: Payload::Num(Value::Double(n)),
                    range: start..self.pos,
                })
            }
        }
    }

    fn lex_variable(&mut self, start: usize) -> Result<Token, BuildError> {
        self.bump(); // the flag character, e.g. `$`
        if let Some(d) = self.peek() {
            if d.is_ascii_digit() && d != '0' {
                self.bump();
                let index = d.to_digit(10).unwrap() - 1;
                return Ok(Token {
                    kind: TokenKind::Var,
                    payload: Payload::Var(index),
                    range: start..self.pos,
                });
            }
        }
        if self.peek() == Some(self.syntax.var_start) {
            self.bump();
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            let digits = &self.source[digits_start..self.pos];
            let closed = self.peek() == Some(self.syntax.var_end);
            if closed {
                self.bump();
            }
            if digits.is_empty() || !closed {
                return Err(BuildError::InvalidVariableIndex {
                    at: start..self.pos,
                });
            }
            let n: u64 = digits
                .parse()
                .map_err(|_| BuildError::InvalidVariableIndex {
                    at: start..self.pos,
                })?;
            if n == 0 || n > u32::MAX as u64 {
                return Err(BuildError::InvalidVariableIndex {
                    at: start..self.pos,
                });
            }
            return Ok(Token {
                kind: TokenKind::Var,
                payload: Payload::Var((n - 1) as u32),
                range: start..self.pos,
            });
        }
        Err(BuildError::InvalidVariableIndex {
            at: start..self.pos,
        })
    }

    /// Current byte offset of the cursor, used for end-of-input diagnostics.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(src: &str, dt: DataType) -> Vec<TokenKind> {
        let mut t = Tokenizer::new(src, dt, Syntax::default());
        let mut out = Vec::new();
        let mut expect_operand = true;
        while let Some(tok) = t.next(expect_operand).unwrap() {
            expect_operand = !matches!(tok.kind.category(), crate::ast::Category::Value);
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn long_literal() {
        let mut t = Tokenizer::new("42", DataType::Long, Syntax::default());
        let tok = t.next(true).unwrap().unwrap();
        assert_eq!(tok.kind, TokenKind::Num);
        assert_eq!(tok.payload, Payload::Num(Value::Long(42)));
    }

    #[test]
    fn double_literal_with_exponent() {
        let mut t = Tokenizer::new("1.5e-3", DataType::Double, Syntax::default());
        let tok = t.next(true).unwrap().unwrap();
        assert_eq!(tok.payload, Payload::Num(Value::Double(1.5e-3)));
    }

    #[test]
    fn single_digit_variable() {
        let mut t = Tokenizer::new("$3", DataType::Long, Syntax::default());
        let tok = t.next(true).unwrap().unwrap();
        assert_eq!(tok.kind, TokenKind::Var);
        assert_eq!(tok.payload, Payload::Var(2));
    }

    #[test]
    fn braced_variable() {
        let mut t = Tokenizer::new("${12}", DataType::Long, Syntax::default());
        let tok = t.next(true).unwrap().unwrap();
        assert_eq!(tok.payload, Payload::Var(11));
    }

    #[test]
    fn zero_variable_index_is_invalid() {
        let mut t = Tokenizer::new("${0}", DataType::Long, Syntax::default());
        assert_matches!(t.next(true), Err(BuildError::InvalidVariableIndex { .. }));
    }

    #[test]
    fn minus_is_context_sensitive() {
        assert_eq!(
            kinds("1 - 2", DataType::Long),
            vec![TokenKind::Num, TokenKind::Minus, TokenKind::Num]
        );
        assert_eq!(
            kinds("-1 + 2", DataType::Long),
            vec![
                TokenKind::Neg,
                TokenKind::Num,
                TokenKind::Plus,
                TokenKind::Num
            ]
        );
    }

    #[test]
    fn function_tokens_consume_their_paren() {
        assert_eq!(
            kinds("sqrt(4)", DataType::Double),
            vec![TokenKind::Sqrt, TokenKind::Num, TokenKind::ParenRight]
        );
    }

    #[test]
    fn lone_ampersand_is_unrecognised() {
        let mut t = Tokenizer::new("&1", DataType::Long, Syntax::default());
        assert_matches!(t.next(true), Err(BuildError::UnrecognisedToken { .. }));
    }
}
