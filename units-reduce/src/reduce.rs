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

//! Canonicalizing reduction
//!
//! `units-parser` already substitutes a non-primitive unit's body at parse
//! time, so a value that came out of [`units_parser::parse`] arrives here
//! with only primitive atoms. [`reduce`] still earns its keep two ways: it
//! is the only place that performs the final sort-and-cancel
//! canonicalization (parsing "meter * foot / meter" leaves raw, uncancelled
//! atom bags), and its rewrite loop is a defensive, idempotent pass that
//! makes no assumption about how a `Value` was built — a pass the source
//! program's own reducer has no equivalent-free analogue for, since it never
//! trusted its parser to have already resolved everything.

use units_core::{Error, ErrorKind, Value};
use units_db::Database;
use units_parser::{Context, FunctionEvaluator};

/// Safety bound on rewrite iterations; a well-formed database reaches
/// primitives in a handful of steps; only a cyclic or pathological
/// definition chain would ever approach this.
const MAX_REWRITE_ITERATIONS: usize = 1 << 16;

enum Side {
    Numerator,
    Denominator,
}

/// Rewrites `value`'s atoms against `db` until every atom is primitive, then
/// sorts and cancels.
pub fn reduce(
    mut value: Value,
    db: &Database,
    config: &units_core::Config,
    evaluator: &dyn FunctionEvaluator,
) -> Result<Value, Error> {
    for _ in 0..MAX_REWRITE_ITERATIONS {
        match first_nonprimitive(&value, db)? {
            None => {
                value.sort_and_cancel();
                return Ok(value);
            }
            Some((side, index, body)) => {
                let mut ctx = Context::new(db, config, evaluator);
                let expansion = units_parser::parse(&body, &mut ctx)?;
                match side {
                    Side::Numerator => {
                        value.take_numerator(index);
                        value.mul_assign(expansion)?;
                    }
                    Side::Denominator => {
                        value.take_denominator(index);
                        value.div_assign(expansion)?;
                    }
                }
            }
        }
    }
    Err(Error::new(ErrorKind::Reduce))
}

/// Finds the first non-cancelled atom whose database definition is not
/// primitive (or that names nothing at all, which should be unreachable
/// given the parser's own contract, but is reported rather than panicked on).
fn first_nonprimitive(value: &Value, db: &Database) -> Result<Option<(Side, usize, String)>, Error> {
    for (i, atom) in value.numerator().iter().enumerate() {
        if atom.is_cancelled() {
            continue;
        }
        match db.unit(atom.as_str()) {
            Some(def) if def.primitive => {}
            Some(def) => return Ok(Some((Side::Numerator, i, def.body.clone()))),
            None => return Err(Error::new(ErrorKind::UnknownUnit(atom.as_str().to_string()))),
        }
    }
    for (i, atom) in value.denominator().iter().enumerate() {
        if atom.is_cancelled() {
            continue;
        }
        match db.unit(atom.as_str()) {
            Some(def) if def.primitive => {}
            Some(def) => return Ok(Some((Side::Denominator, i, def.body.clone()))),
            None => return Err(Error::new(ErrorKind::UnknownUnit(atom.as_str().to_string()))),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::{Atom, Config};
    use units_db::{SourceLocation, UnitDef};

    struct NoFunctions;
    impl FunctionEvaluator for NoFunctions {
        fn evaluate(&self, _name: &str, _argument: Value, _inverse: bool) -> Result<Value, Error> {
            Err(Error::new(ErrorKind::BadFuncArg))
        }
        fn is_function(&self, _name: &str) -> bool {
            false
        }
    }

    fn sample_db() -> Database {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        db
    }

    #[test]
    fn sorts_and_cancels_already_primitive_atoms() {
        let db = sample_db();
        let config = Config::default();
        let mut value = Value::atom("meter");
        value.numerator_mut().push(Atom::new("second"));
        value.denominator_mut().push(Atom::new("meter"));
        let reduced = reduce(value, &db, &config, &NoFunctions).unwrap();
        assert_eq!(reduced.live_numerator().cloned().collect::<Vec<_>>(), vec![Atom::new("second")]);
        assert!(reduced.live_denominator().next().is_none());
    }

    #[test]
    fn rewrites_a_non_primitive_atom_left_in_place() {
        let mut db = sample_db();
        db.insert_unit(UnitDef {
            name: "foot".into(),
            body: "0.3048 meter".into(),
            primitive: false,
            dimension_tag: None,
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        let config = Config::default();
        let value = Value::atom("foot");
        let reduced = reduce(value, &db, &config, &NoFunctions).unwrap();
        assert!((reduced.factor - 0.3048).abs() < 1e-12);
        assert_eq!(reduced.live_numerator().cloned().collect::<Vec<_>>(), vec![Atom::new("meter")]);
    }

    #[test]
    fn unknown_atom_is_reported() {
        let db = sample_db();
        let config = Config::default();
        let value = Value::atom("bogus");
        let err = reduce(value, &db, &config, &NoFunctions).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownUnit("bogus".to_string()));
    }
}
