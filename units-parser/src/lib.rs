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

//! Recursive-descent parser turning a unit expression string into a
//! [`units_core::Value`].
//!
//! The parser owns identifier resolution: it walks a name through
//! [`units_db::resolve`] and, for a non-primitive unit, recursively parses
//! the unit's definition body, so a fully parsed expression already carries
//! only primitive atoms. Nonlinear functions (`tempF(x)`, `~tempF(x)`) are
//! dispatched through the [`FunctionEvaluator`] trait rather than a direct
//! dependency on `units-reduce`, which implements it.

mod context;
mod lexer;
mod parser;
mod token;

pub use context::{Context, FunctionEvaluator};
pub use parser::parse;
pub use token::{LexError, Operator, Token, TokenError, TokenValue, Tokens};
