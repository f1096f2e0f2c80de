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

//! The parsing context: everything the parser needs from its surroundings.
//!
//! The project this crate is modeled on kept this state
//! (`irreducible_name`, a lookup scratch buffer, the function-parameter
//! slot) in process-wide globals. Here it is an explicit, stack-allocated
//! [`Context`] passed by `&mut` reference through every recursive call, so
//! nested function application composes correctly and the parser is safe to
//! use from more than one caller at a time.

use units_core::{Config, Error, ErrorKind, Value};
use units_db::Database;

/// Evaluates a named nonlinear function forward or backward.
///
/// The parser depends on this trait rather than on `units-reduce` directly:
/// `units-reduce` implements it (it owns the reduction algorithm that
/// function evaluation itself needs) and hands an implementor to the parser
/// through [`Context::new`]. This mirrors the teacher program's `Env`
/// dependency-inversion for variable access.
pub trait FunctionEvaluator {
    /// Applies the function named `name` to `argument`. `inverse` selects
    /// the `~name(...)` reading.
    fn evaluate(&self, name: &str, argument: Value, inverse: bool) -> Result<Value, Error>;

    /// Whether `name` is a known function (used to decide whether `NAME(`
    /// should be parsed as a call or as an error).
    fn is_function(&self, name: &str) -> bool;
}

/// Parsing context threaded through every recursive-descent call.
pub struct Context<'a> {
    pub db: &'a Database,
    pub config: &'a Config,
    evaluator: &'a dyn FunctionEvaluator,
    parameter: Option<(String, Value)>,
    depth: usize,
}

impl<'a> Context<'a> {
    pub fn new(db: &'a Database, config: &'a Config, evaluator: &'a dyn FunctionEvaluator) -> Self {
        Context {
            db,
            config,
            evaluator,
            parameter: None,
            depth: 0,
        }
    }

    pub fn evaluator(&self) -> &'a dyn FunctionEvaluator {
        self.evaluator
    }

    /// Returns the currently bound function parameter, if any, substituted
    /// when the parser encounters an identifier matching its name.
    pub fn parameter(&self) -> Option<(&str, &Value)> {
        self.parameter.as_ref().map(|(n, v)| (n.as_str(), v))
    }

    /// Swaps in a new function-parameter binding and returns the previous
    /// one. Callers (the function engine, when it parses a function body)
    /// must pass the returned value back to [`Context::restore_parameter`]
    /// once the body has been parsed, even on an error path.
    pub fn bind_parameter(&mut self, name: String, value: Value) -> Option<(String, Value)> {
        self.parameter.replace((name, value))
    }

    pub fn restore_parameter(&mut self, saved: Option<(String, Value)>) {
        self.parameter = saved;
    }

    pub(crate) fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.config.parse_depth_limit {
            return Err(Error::new(ErrorKind::ParseMem));
        }
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.depth -= 1;
    }
}
