// This file is part of units, a units-of-measurement conversion library.
// Copyright (C) 2026 Mara Lindqvist
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

//! Tokenization of unit expressions

use std::iter::FusedIterator;
use std::ops::Range;
use thiserror::Error;

/// Operator lexemes. `**` and `^` are the same operator (exponent); `*` and
/// `/` are kept distinct from juxtaposition, which the parser synthesizes
/// when two factors sit next to each other with no operator between them.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    OpenParen,
    CloseParen,
    Tilde,
}

/// Value of a [`Token`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue<'a> {
    Number(f64),
    Ident(&'a str),
    Operator(Operator),
    EndOfInput,
}

/// Atomic lexical element of an expression, with the byte range it occupies
/// in the source (used for caret placement in error messages).
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    pub value: TokenValue<'a>,
    pub location: Range<usize>,
}

/// Cause of a tokenization error.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TokenError {
    #[error("invalid numeric constant")]
    InvalidNumericConstant,
    #[error("invalid character")]
    InvalidCharacter,
}

/// A tokenization error with its location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LexError {
    pub cause: TokenError,
    pub location: Range<usize>,
}

const OPERATORS: &[(&str, Operator)] = &[
    ("**", Operator::Caret),
    ("^", Operator::Caret),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Star),
    ("/", Operator::Slash),
    ("(", Operator::OpenParen),
    (")", Operator::CloseParen),
    ("~", Operator::Tilde),
];

/// Iterator extracting tokens from a string. Never yields `None`; once the
/// input is exhausted it yields `TokenValue::EndOfInput` forever, which lets
/// callers peek past the end without special-casing `Option`.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(source: &'a str) -> Self {
        Tokens { source, index: 0 }
    }

    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        let rest = self.source[self.index..].trim_start();
        let start = self.source.len() - rest.len();
        let Some(first) = rest.chars().next() else {
            return Ok(Token {
                value: TokenValue::EndOfInput,
                location: start..start,
            });
        };

        if first.is_ascii_digit() || first == '.' {
            return self.lex_number(rest, start);
        }

        if first.is_alphabetic() || first == '_' {
            let end_rel = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let end = start + end_rel;
            self.index = end;
            return Ok(Token {
                value: TokenValue::Ident(&rest[..end_rel]),
                location: start..end,
            });
        }

        if let Some(&(lexeme, op)) = OPERATORS.iter().find(|(lex, _)| rest.starts_with(lex)) {
            let end = start + lexeme.len();
            self.index = end;
            return Ok(Token {
                value: TokenValue::Operator(op),
                location: start..end,
            });
        }

        Err(LexError {
            cause: TokenError::InvalidCharacter,
            location: start..start + first.len_utf8(),
        })
    }

    /// Lexes a number, including the `p|q` ratio form. `p|q` requires both
    /// `p` and `q` to be plain integers; a `.` or exponent in `p` rules out
    /// the ratio reading and `|` is then left for the next token (where it
    /// will be rejected as an invalid character, since `|` has no other
    /// meaning in an expression).
    fn lex_number(&mut self, rest: &str, start: usize) -> Result<Token<'static>, LexError> {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let mut end_rel = int_len;
        let mut is_plain_integer = int_len > 0;

        if rest[end_rel..].starts_with('.') {
            is_plain_integer = false;
            end_rel += 1;
            let frac_len = rest[end_rel..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len() - end_rel);
            end_rel += frac_len;
        }
        if rest[end_rel..].starts_with(['e', 'E']) {
            let mut exp_end = end_rel + 1;
            if rest[exp_end..].starts_with(['+', '-']) {
                exp_end += 1;
            }
            let digits = rest[exp_end..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len() - exp_end);
            if digits > 0 {
                is_plain_integer = false;
                end_rel = exp_end + digits;
            }
        }

        if end_rel == 0 {
            return Err(LexError {
                cause: TokenError::InvalidNumericConstant,
                location: start..start + 1,
            });
        }

        if is_plain_integer && rest[end_rel..].starts_with('|') {
            let denom_start = end_rel + 1;
            let denom_len = rest[denom_start..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len() - denom_start);
            if denom_len > 0 {
                let p: f64 = rest[..int_len].parse().unwrap();
                let q: f64 = rest[denom_start..denom_start + denom_len].parse().unwrap();
                let end = start + denom_start + denom_len;
                self.index = end;
                if q == 0.0 {
                    return Err(LexError {
                        cause: TokenError::InvalidNumericConstant,
                        location: start..end,
                    });
                }
                return Ok(Token {
                    value: TokenValue::Number(p / q),
                    location: start..end,
                });
            }
        }

        let text = &rest[..end_rel];
        let end = start + end_rel;
        match text.parse::<f64>() {
            Ok(n) => {
                self.index = end;
                Ok(Token {
                    value: TokenValue::Number(n),
                    location: start..end,
                })
            }
            Err(_) => Err(LexError {
                cause: TokenError::InvalidNumericConstant,
                location: start..end,
            }),
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_token())
    }
}

impl FusedIterator for Tokens<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_numbers() {
        assert_eq!(Tokens::new("1").next_token().unwrap().value, TokenValue::Number(1.0));
        assert_eq!(Tokens::new("3.25").next_token().unwrap().value, TokenValue::Number(3.25));
        assert_eq!(Tokens::new(".5").next_token().unwrap().value, TokenValue::Number(0.5));
        assert_eq!(Tokens::new("1e3").next_token().unwrap().value, TokenValue::Number(1000.0));
        assert_eq!(Tokens::new("2.5e-2").next_token().unwrap().value, TokenValue::Number(0.025));
    }

    #[test]
    fn ratio_numbers() {
        assert_eq!(Tokens::new("1|2").next_token().unwrap().value, TokenValue::Number(0.5));
        assert_eq!(Tokens::new("22|7").next_token().unwrap().value, TokenValue::Number(22.0 / 7.0));
    }

    #[test]
    fn ratio_requires_integer_numerator() {
        let mut tokens = Tokens::new("1.5|2");
        assert_eq!(tokens.next_token().unwrap().value, TokenValue::Number(1.5));
        assert_eq!(tokens.next_token().unwrap_err().cause, TokenError::InvalidCharacter);
    }

    #[test]
    fn identifiers() {
        assert_eq!(Tokens::new("meter").next_token().unwrap().value, TokenValue::Ident("meter"));
        assert_eq!(Tokens::new("foo_2").next_token().unwrap().value, TokenValue::Ident("foo_2"));
    }

    #[test]
    fn operators() {
        assert_eq!(Tokens::new("**").next_token().unwrap().value, TokenValue::Operator(Operator::Caret));
        assert_eq!(Tokens::new("^").next_token().unwrap().value, TokenValue::Operator(Operator::Caret));
        assert_eq!(Tokens::new("~").next_token().unwrap().value, TokenValue::Operator(Operator::Tilde));
    }

    #[test]
    fn end_of_input_repeats() {
        let mut tokens = Tokens::new("");
        assert_eq!(tokens.next_token().unwrap().value, TokenValue::EndOfInput);
        assert_eq!(tokens.next_token().unwrap().value, TokenValue::EndOfInput);
    }

    #[test]
    fn invalid_character_is_reported() {
        let err = Tokens::new("@").next_token().unwrap_err();
        assert_eq!(err.cause, TokenError::InvalidCharacter);
        assert_eq!(err.location, 0..1);
    }
}
