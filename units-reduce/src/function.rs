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

//! Nonlinear function evaluation: lookup tables and forward/inverse
//! functional forms.
//!
//! A functional form's single bracketed dimension (`[DIM]`) is the
//! co-domain shared by the forward branch's output and the inverse branch's
//! input — exactly like a table's `co_unit` — while the branch's own
//! parameter is always a bare number in the function's own, otherwise
//! untagged, domain. `tempF(x) [tempC] (x-32)/1.8 ; x*1.8+32` reads: `x` is
//! a plain Fahrenheit count, the forward body produces a `tempC`-tagged
//! result, and `~tempF(v)` requires `v` conformable to `tempC` before
//! applying the inverse body to the corresponding plain count. The two-part
//! `[DIM_IN;DIM_OUT]` spelling is accepted by the loader but, for now, only
//! the first half is consulted here; see the project's design notes.

use units_core::{Config, Error, ErrorKind, Value};
use units_db::{Branch, Database, FunctionDef, TableDef};
use units_parser::{Context, FunctionEvaluator};

use crate::predicate::conformable;

/// Evaluates named functions against a database, implementing
/// [`FunctionEvaluator`] so `units-parser` can dispatch `NAME(expr)` and
/// `~NAME(expr)` without depending on this crate directly.
pub struct FunctionEngine<'a> {
    db: &'a Database,
    config: &'a Config,
}

impl<'a> FunctionEngine<'a> {
    pub fn new(db: &'a Database, config: &'a Config) -> Self {
        FunctionEngine { db, config }
    }

    fn reference(&self, dim: &str) -> Result<Value, Error> {
        let mut ctx = Context::new(self.db, self.config, self);
        units_parser::parse(dim, &mut ctx)
    }

    fn evaluate_table(&self, table: &TableDef, argument: Value, inverse: bool) -> Result<Value, Error> {
        if !inverse {
            if !argument.is_dimensionless() {
                return Err(Error::new(ErrorKind::BadFuncArg));
            }
            let y = lerp(&table.points, argument.factor)?;
            let mut result = Value::number(y);
            if !table.co_unit.trim().is_empty() {
                result.mul_assign(self.reference(&table.co_unit)?)?;
            }
            Ok(result)
        } else {
            let plain = if table.co_unit.trim().is_empty() {
                if !argument.is_dimensionless() {
                    return Err(Error::new(ErrorKind::BadFuncArg));
                }
                argument.factor
            } else {
                let co_unit = self.reference(&table.co_unit)?;
                if !conformable(&argument, &co_unit) {
                    return Err(Error::new(ErrorKind::BadFuncArg));
                }
                argument.factor / co_unit.factor
            };
            let x = lerp_inverse(&table.points, plain)?;
            Ok(Value::number(x))
        }
    }

    fn evaluate_functional(
        &self,
        forward: &Branch,
        inverse_branch: Option<&Branch>,
        argument: Value,
        inverse: bool,
    ) -> Result<Value, Error> {
        if !inverse {
            if !argument.is_dimensionless() {
                return Err(Error::new(ErrorKind::BadFuncArg));
            }
            let mut ctx = Context::new(self.db, self.config, self);
            let saved = ctx.bind_parameter(forward.param_name.clone(), Value::number(argument.factor));
            let result = units_parser::parse(&forward.body, &mut ctx);
            ctx.restore_parameter(saved);
            let mut result = result?;
            if let Some(dim) = &forward.dimension {
                result.mul_assign(self.reference(dim)?)?;
            }
            Ok(result)
        } else {
            let branch = inverse_branch.ok_or_else(|| Error::new(ErrorKind::NoInverse))?;
            let ratio = match &forward.dimension {
                Some(dim) => {
                    let reference = self.reference(dim)?;
                    if !conformable(&argument, &reference) {
                        return Err(Error::new(ErrorKind::BadFuncArg));
                    }
                    argument.factor / reference.factor
                }
                None => {
                    if !argument.is_dimensionless() {
                        return Err(Error::new(ErrorKind::BadFuncArg));
                    }
                    argument.factor
                }
            };
            let mut ctx = Context::new(self.db, self.config, self);
            let saved = ctx.bind_parameter(branch.param_name.clone(), Value::number(ratio));
            let result = units_parser::parse(&branch.body, &mut ctx);
            ctx.restore_parameter(saved);
            result
        }
    }
}

impl FunctionEvaluator for FunctionEngine<'_> {
    fn evaluate(&self, name: &str, argument: Value, inverse: bool) -> Result<Value, Error> {
        match self.db.find_function(name) {
            Some(FunctionDef::Table(table)) => self.evaluate_table(table, argument, inverse),
            Some(FunctionDef::Functional { forward, inverse: inv, .. }) => {
                self.evaluate_functional(forward, inv.as_ref(), argument, inverse)
            }
            None => Err(Error::new(ErrorKind::UnknownUnit(name.to_string()))),
        }
    }

    fn is_function(&self, name: &str) -> bool {
        self.db.find_function(name).is_some()
    }
}

/// Linear interpolation of `x` within `points` (sorted, strictly increasing
/// in `x` per the loader's invariant).
fn lerp(points: &[(f64, f64)], x: f64) -> Result<f64, Error> {
    if points.len() < 2 {
        return Err(Error::new(ErrorKind::BadTable));
    }
    if x < points[0].0 || x > points[points.len() - 1].0 {
        return Err(Error::new(ErrorKind::NotInDomain));
    }
    for window in points.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if x >= x0 && x <= x1 {
            if x1 == x0 {
                return Ok(y0);
            }
            let t = (x - x0) / (x1 - x0);
            return Ok(y0 + t * (y1 - y0));
        }
    }
    Err(Error::new(ErrorKind::NotInDomain))
}

/// Inverse interpolation: finds `x` such that `lerp(points, x) == y`. Assumes
/// `y` is monotonic along `points` (the integrity check verifies this
/// separately); tolerates either increasing or decreasing `y`.
fn lerp_inverse(points: &[(f64, f64)], y: f64) -> Result<f64, Error> {
    if points.len() < 2 {
        return Err(Error::new(ErrorKind::BadTable));
    }
    let (y0, yn) = (points[0].1, points[points.len() - 1].1);
    let (lo, hi) = if y0 <= yn { (y0, yn) } else { (yn, y0) };
    if y < lo || y > hi {
        return Err(Error::new(ErrorKind::NotInDomain));
    }
    for window in points.windows(2) {
        let (x0, ya) = window[0];
        let (x1, yb) = window[1];
        let within = if ya <= yb { y >= ya && y <= yb } else { y >= yb && y <= ya };
        if within {
            if yb == ya {
                return Ok(x0);
            }
            let t = (y - ya) / (yb - ya);
            return Ok(x0 + t * (x1 - x0));
        }
    }
    Err(Error::new(ErrorKind::NotInDomain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_db::{SourceLocation, UnitDef};

    fn db_with_temp() -> Database {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "tempC".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        db.insert_function(FunctionDef::Functional {
            name: "tempF".into(),
            forward: Branch {
                param_name: "x".into(),
                body: "(x-32)/1.8".into(),
                dimension: Some("tempC".into()),
            },
            inverse: Some(Branch {
                param_name: "x".into(),
                body: "x*1.8+32".into(),
                dimension: None,
            }),
            location: SourceLocation::new("test", 1),
        });
        db
    }

    #[test]
    fn forward_and_inverse_round_trip() {
        let db = db_with_temp();
        let config = Config::default();
        let engine = FunctionEngine::new(&db, &config);
        let forward = engine.evaluate("tempF", Value::number(212.0), false).unwrap();
        assert!((forward.factor - 100.0).abs() < 1e-9);
        let back = engine.evaluate("tempF", forward, true).unwrap();
        assert!((back.factor - 212.0).abs() < 1e-9);
    }

    #[test]
    fn table_forward_interpolates() {
        let mut db = Database::new();
        db.insert_function(FunctionDef::Table(TableDef {
            name: "grade".into(),
            co_unit: String::new(),
            points: vec![(0.0, 0.0), (1.0, 100.0)],
            location: SourceLocation::new("test", 1),
        }));
        let config = Config::default();
        let engine = FunctionEngine::new(&db, &config);
        let result = engine.evaluate("grade", Value::number(0.5), false).unwrap();
        assert!((result.factor - 50.0).abs() < 1e-9);
    }

    #[test]
    fn table_out_of_domain_is_reported() {
        let mut db = Database::new();
        db.insert_function(FunctionDef::Table(TableDef {
            name: "grade".into(),
            co_unit: String::new(),
            points: vec![(0.0, 0.0), (1.0, 100.0)],
            location: SourceLocation::new("test", 1),
        }));
        let config = Config::default();
        let engine = FunctionEngine::new(&db, &config);
        let err = engine.evaluate("grade", Value::number(2.0), false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotInDomain);
    }

    #[test]
    fn missing_inverse_branch_is_reported() {
        let mut db = Database::new();
        db.insert_function(FunctionDef::Functional {
            name: "oneway".into(),
            forward: Branch {
                param_name: "x".into(),
                body: "x*2".into(),
                dimension: None,
            },
            inverse: None,
            location: SourceLocation::new("test", 1),
        });
        let config = Config::default();
        let engine = FunctionEngine::new(&db, &config);
        let err = engine.evaluate("oneway", Value::number(1.0), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoInverse);
    }
}
