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

//! Unit, prefix and function definitions

use std::fmt;
use std::rc::Rc;

/// Where a definition came from, for error messages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceLocation {
    pub file: Rc<str>,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<Rc<str>>, line: usize) -> Self {
        SourceLocation {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A unit definition: `name` maps to the unparsed expression `body`.
///
/// If `body` contains [`units_core::PRIMITIVE_MARK`] the unit is
/// irreducible; `dimension_tag` carries the optional `!dimensionless` (or
/// other) tag that follows the mark.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitDef {
    pub name: String,
    pub body: String,
    pub primitive: bool,
    pub dimension_tag: Option<String>,
    pub location: SourceLocation,
}

/// A prefix definition. `text` is stored without the trailing `-` that marks
/// it as a prefix in the source syntax.
#[derive(Clone, Debug, PartialEq)]
pub struct PrefixDef {
    pub text: String,
    pub body: String,
    pub location: SourceLocation,
}

/// One branch (forward or inverse) of a functional-form function.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub param_name: String,
    pub body: String,
    /// Required dimension of the branch's input, if any (`[DIM]` or the
    /// `DIM_IN` half of `[DIM_IN;DIM_OUT]`).
    pub dimension: Option<String>,
}

/// A piecewise-linear table function: `points.x` is strictly increasing.
#[derive(Clone, Debug, PartialEq)]
pub struct TableDef {
    pub name: String,
    pub co_unit: String,
    pub points: Vec<(f64, f64)>,
    pub location: SourceLocation,
}

/// A user-defined nonlinear function, either a lookup table or a forward
/// (and optionally inverse) functional form.
#[derive(Clone, Debug, PartialEq)]
pub enum FunctionDef {
    Table(TableDef),
    Functional {
        name: String,
        forward: Branch,
        inverse: Option<Branch>,
        location: SourceLocation,
    },
}

impl FunctionDef {
    pub fn name(&self) -> &str {
        match self {
            FunctionDef::Table(t) => &t.name,
            FunctionDef::Functional { name, .. } => name,
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            FunctionDef::Table(t) => &t.location,
            FunctionDef::Functional { location, .. } => location,
        }
    }
}
