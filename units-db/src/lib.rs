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

//! The unit/prefix/function database: loading from text sources and
//! resolving names to definition bodies.

mod database;
mod definition;
mod loader;
mod lookup;

pub use database::{Database, RedefinitionError};
pub use definition::{Branch, FunctionDef, PrefixDef, SourceLocation, TableDef, UnitDef};
pub use loader::{load_file, load_str, LoadError, LoadReport, MAX_INCLUDE_DEPTH};
pub use lookup::resolve;
