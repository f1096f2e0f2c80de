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

//! The interactive/one-shot command line driver built on top of
//! `units-core`, `units-db`, `units-parser`, `units-reduce` and
//! `units-convert`.

mod args;
mod diagnostics;
mod driver;
mod locate;

pub use args::{parse as parse_args, ArgsError, Mode, Options, Parse};
pub use driver::{run, EXIT_ERROR, EXIT_FATAL, EXIT_OK};
