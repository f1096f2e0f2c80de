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

//! The error taxonomy shared by every stage of the engine

use std::ops::Range;
use thiserror::Error as ThisError;

/// Cause of a failure anywhere in the units engine.
///
/// The variant names are normative for the taxonomy (see the project's
/// design notes); they do not correspond to any particular wire or exit-code
/// scheme.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorKind {
    /// Malformed expression.
    #[error("parse error")]
    Parse,
    /// An atom bag grew past its capacity.
    #[error("unit product overflow")]
    ProdOverflow,
    /// A definition in the database fails to reduce.
    #[error("bad database definition")]
    Reduce,
    /// `+` or `-` of non-conformable values.
    #[error("non-conformable sum")]
    BadSum,
    /// A value required to be dimensionless was not.
    #[error("not a number")]
    NotANumber,
    /// The requested root does not divide every exponent evenly.
    #[error("not a root")]
    NotRoot,
    /// A name has no definition.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    /// A function argument has the wrong dimension.
    #[error("bad function argument")]
    BadFuncArg,
    /// A table argument falls outside the table's `x` range.
    #[error("not in domain")]
    NotInDomain,
    /// A table definition is invalid.
    #[error("bad table")]
    BadTable,
    /// A function has no inverse branch.
    #[error("no inverse")]
    NoInverse,
    /// Parser recursion exceeded its bound.
    #[error("parser recursion limit exceeded")]
    ParseMem,
    /// A nonlinear function body failed to parse.
    #[error("function argument definition error")]
    FunArgDef,
    /// A database file could not be opened.
    #[error("cannot open file '{0}'")]
    File(String),
    /// A database file loaded with recoverable errors.
    #[error("database file had errors")]
    BadFile,
    /// Allocation failed.
    #[error("out of memory")]
    Memory,
}

/// An error together with the source offset it should be blamed on, when
/// one is known.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    /// Byte range in the offending expression, for caret placement.
    pub location: Option<Range<usize>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            location: None,
        }
    }

    pub fn at(kind: ErrorKind, location: Range<usize>) -> Self {
        Error {
            kind,
            location: Some(location),
        }
    }

    pub fn with_location(mut self, location: Range<usize>) -> Self {
        self.location = Some(location);
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}
