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

//! Canonicalization, nonlinear function evaluation, and whole-database
//! integrity checking, built on top of `units-parser`'s `Value`s.

mod function;
mod integrity;
mod predicate;
mod reduce;

pub use function::FunctionEngine;
pub use integrity::{check, Finding};
pub use predicate::{compareunits, conformable, IgnorePredicate};
pub use reduce::reduce;
