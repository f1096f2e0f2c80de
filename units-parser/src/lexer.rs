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

//! A one-token-of-lookahead wrapper around [`Tokens`]

use crate::token::{LexError, Token, Tokens};

/// Peekable tokenizer used by the recursive-descent parser.
pub struct Lexer<'a> {
    inner: Tokens<'a>,
    cached: Option<Result<Token<'a>, LexError>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            inner: Tokens::new(source),
            cached: None,
        }
    }

    pub fn next(&mut self) -> Result<Token<'a>, LexError> {
        self.cached.take().unwrap_or_else(|| self.inner.next_token())
    }

    pub fn peek(&mut self) -> &Result<Token<'a>, LexError> {
        self.cached.get_or_insert_with(|| self.inner.next_token())
    }
}
