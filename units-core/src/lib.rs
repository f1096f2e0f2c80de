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

//! Core data model for the units algebra engine.
//!
//! This crate defines the pieces that every other `units-*` crate builds on:
//! the [`Atom`] identifier type, the [`Value`] rational-product representation
//! of a unit expression, the [`Error`]/[`ErrorKind`] taxonomy, and the
//! [`Config`] record that threads parser and formatter behavior through the
//! engine instead of relying on process-wide state.

mod atom;
mod config;
mod error;
mod value;

pub use atom::Atom;
pub use config::{Config, Verbosity};
pub use error::{Error, ErrorKind};
pub use value::Value;

/// Character that marks a unit definition body as irreducible.
pub const PRIMITIVE_MARK: char = '!';

/// Tag recognized after [`PRIMITIVE_MARK`] that marks an atom as dimensionless.
pub const DIMENSIONLESS_TAG: &str = "dimensionless";
