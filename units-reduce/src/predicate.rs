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

//! Conformability: deciding whether two values share a dimension, with a
//! predicate selecting which atoms to disregard while deciding.

use units_core::{Atom, Value};
use units_db::Database;

/// Which atoms a conformability check should treat as absent before
/// comparing two values' dimensions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IgnorePredicate {
    /// Every atom counts; the two bags must match exactly.
    Nothing,
    /// Atoms tagged `!dimensionless` in the database (e.g. `radian`) are
    /// dropped from both sides before comparing.
    Dimless,
    /// Atoms that resolve to a primitive definition are dropped from both
    /// sides before comparing; used by the integrity check to verify that a
    /// reduction left nothing but primitives behind.
    Primitive,
}

impl IgnorePredicate {
    fn keep(&self, atom: &Atom, db: Option<&Database>) -> bool {
        match self {
            IgnorePredicate::Nothing => true,
            IgnorePredicate::Dimless => !is_dimensionless_tagged(atom, db),
            IgnorePredicate::Primitive => !is_primitive(atom, db),
        }
    }
}

fn is_dimensionless_tagged(atom: &Atom, db: Option<&Database>) -> bool {
    db.and_then(|d| d.unit(atom.as_str()))
        .and_then(|def| def.dimension_tag.as_deref())
        .is_some_and(|tag| tag == units_core::DIMENSIONLESS_TAG)
}

fn is_primitive(atom: &Atom, db: Option<&Database>) -> bool {
    db.and_then(|d| d.unit(atom.as_str())).is_some_and(|def| def.primitive)
}

fn signature(value: &Value, predicate: &IgnorePredicate, db: Option<&Database>) -> (Vec<String>, Vec<String>) {
    let mut value = value.clone();
    value.sort_and_cancel();
    let nums = value
        .live_numerator()
        .filter(|a| predicate.keep(a, db))
        .map(|a| a.as_str().to_string())
        .collect();
    let dens = value
        .live_denominator()
        .filter(|a| predicate.keep(a, db))
        .map(|a| a.as_str().to_string())
        .collect();
    (nums, dens)
}

/// Whether `a` and `b` describe the same physical dimension, up to the given
/// predicate's ignored atoms. This only compares atom bags, never `factor`:
/// a conformable pair may still require a nonzero scale to convert between.
pub fn compareunits(a: &Value, b: &Value, predicate: &IgnorePredicate, db: Option<&Database>) -> bool {
    signature(a, predicate, db) == signature(b, predicate, db)
}

/// Shorthand for [`compareunits`] with [`IgnorePredicate::Nothing`].
pub fn conformable(a: &Value, b: &Value) -> bool {
    compareunits(a, b, &IgnorePredicate::Nothing, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::Atom as A;

    #[test]
    fn conformable_values_share_atoms() {
        let mut a = Value::atom("meter");
        a.numerator_mut().push(A::new("meter"));
        let b = Value::atom("meter").pow_int(2).unwrap();
        assert!(conformable(&a, &b));
    }

    #[test]
    fn nonconformable_values_differ() {
        let a = Value::atom("meter");
        let b = Value::atom("second");
        assert!(!conformable(&a, &b));
    }

    #[test]
    fn dimless_predicate_ignores_tagged_atoms() {
        let mut db = Database::new();
        db.insert_unit(units_db::UnitDef {
            name: "radian".into(),
            body: "!dimensionless".into(),
            primitive: true,
            dimension_tag: Some("dimensionless".into()),
            location: units_db::SourceLocation::new("test", 1),
        })
        .unwrap();
        let a = Value::atom("radian");
        let b = Value::number(1.0);
        assert!(!compareunits(&a, &b, &IgnorePredicate::Nothing, Some(&db)));
        assert!(compareunits(&a, &b, &IgnorePredicate::Dimless, Some(&db)));
    }

    #[test]
    fn primitive_predicate_ignores_primitive_atoms() {
        let mut db = Database::new();
        db.insert_unit(units_db::UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: units_db::SourceLocation::new("test", 1),
        })
        .unwrap();
        let a = Value::atom("meter");
        let b = Value::number(1.0);
        assert!(!compareunits(&a, &b, &IgnorePredicate::Nothing, Some(&db)));
        assert!(compareunits(&a, &b, &IgnorePredicate::Primitive, Some(&db)));
    }
}
