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

//! Whole-database integrity check: every unit reduces, every function
//! round-trips, and a handful of known-fragile patterns are flagged.

use units_core::{Config, Value};
use units_db::{Database, FunctionDef};
use units_parser::{Context, FunctionEvaluator};

use crate::function::FunctionEngine;
use crate::predicate::{compareunits, IgnorePredicate};
use crate::reduce::reduce;

/// One finding from [`check`]. `fatal` findings mean the definition could
/// never be used; non-fatal ones describe a pattern worth a second look.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Finding {
    pub name: String,
    pub message: String,
    pub fatal: bool,
}

/// Round trip tolerance for function forward/inverse checks.
const ROUND_TRIP_TOLERANCE: f64 = 1e-12;
/// Input used to exercise a function's forward/inverse round trip.
const ROUND_TRIP_PROBE: f64 = 7.0;

/// Walks every unit, prefix and function in `db`, reporting reducibility
/// failures and known-fragile authoring patterns.
pub fn check(db: &Database, config: &Config) -> Vec<Finding> {
    let mut findings = Vec::new();
    let engine = FunctionEngine::new(db, config);

    for unit in db.units() {
        if unit.primitive {
            continue;
        }
        let mut ctx = Context::new(db, config, &engine);
        match units_parser::parse(&unit.body, &mut ctx) {
            Err(e) => findings.push(Finding {
                name: unit.name.clone(),
                message: format!("does not reduce to primitives: {e}"),
                fatal: true,
            }),
            Ok(value) => match reduce(value, db, config, &engine) {
                Err(e) => findings.push(Finding {
                    name: unit.name.clone(),
                    message: format!("does not reduce to primitives: {e}"),
                    fatal: true,
                }),
                Ok(reduced) => {
                    if !compareunits(&reduced, &Value::number(1.0), &IgnorePredicate::Primitive, Some(db)) {
                        findings.push(Finding {
                            name: unit.name.clone(),
                            message: "reduces to a value with non-primitive atoms remaining".to_string(),
                            fatal: true,
                        });
                    }
                }
            },
        }
        check_minus_flip(db, config, &engine, unit, &mut findings);
    }

    for prefix in db.prefixes() {
        if prefix.body.contains('/') {
            findings.push(Finding {
                name: format!("{}-", prefix.text),
                message: "prefix body contains '/', which may combine unexpectedly with a following unit name".to_string(),
                fatal: false,
            });
        }
    }

    for function in db.functions() {
        match function {
            FunctionDef::Table(table) => {
                if table.points.windows(2).any(|w| {
                    let (_, y0) = w[0];
                    let (_, y1) = w[1];
                    y1 == y0
                }) {
                    findings.push(Finding {
                        name: table.name.clone(),
                        message: "table is not strictly monotonic in y; inverse lookups may be ambiguous".to_string(),
                        fatal: false,
                    });
                }
            }
            FunctionDef::Functional { name, inverse, .. } => {
                if inverse.is_some() {
                    check_round_trip(&engine, name, &mut findings);
                }
            }
        }
    }

    findings
}

fn check_minus_flip(
    db: &Database,
    config: &Config,
    engine: &FunctionEngine,
    unit: &units_db::UnitDef,
    findings: &mut Vec<Finding>,
) {
    if !unit.body.contains('-') {
        return;
    }
    let mut minus_on = config.clone();
    minus_on.minus = true;
    let mut minus_off = config.clone();
    minus_off.minus = false;

    let mut ctx_on = Context::new(db, &minus_on, engine);
    let mut ctx_off = Context::new(db, &minus_off, engine);
    let (Ok(a), Ok(b)) = (
        units_parser::parse(&unit.body, &mut ctx_on),
        units_parser::parse(&unit.body, &mut ctx_off),
    ) else {
        return;
    };
    if !values_match(&a, &b) {
        findings.push(Finding {
            name: unit.name.clone(),
            message: "definition parses differently depending on the `-` convention; consider parenthesizing".to_string(),
            fatal: false,
        });
    }
}

fn values_match(a: &Value, b: &Value) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.sort_and_cancel();
    b.sort_and_cancel();
    (a.factor - b.factor).abs() < 1e-12
        && a.live_numerator().map(|x| x.as_str()).eq(b.live_numerator().map(|x| x.as_str()))
        && a.live_denominator().map(|x| x.as_str()).eq(b.live_denominator().map(|x| x.as_str()))
}

fn check_round_trip(engine: &FunctionEngine, name: &str, findings: &mut Vec<Finding>) {
    let forward = match engine.evaluate(name, Value::number(ROUND_TRIP_PROBE), false) {
        Ok(v) => v,
        Err(_) => return,
    };
    let back = match engine.evaluate(name, forward, true) {
        Ok(v) => v,
        Err(e) => {
            findings.push(Finding {
                name: name.to_string(),
                message: format!("forward output does not feed back through the inverse: {e}"),
                fatal: false,
            });
            return;
        }
    };
    if !back.is_dimensionless() || (back.factor - ROUND_TRIP_PROBE).abs() > ROUND_TRIP_TOLERANCE {
        findings.push(Finding {
            name: name.to_string(),
            message: format!(
                "forward then inverse does not recover the probe value (got {}, expected {ROUND_TRIP_PROBE})",
                back.factor
            ),
            fatal: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::Config;
    use units_db::{load_str, SourceLocation, UnitDef};

    #[test]
    fn flags_a_definition_that_does_not_reduce() {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "broken".into(),
            body: "nosuchunit".into(),
            primitive: false,
            dimension_tag: None,
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        let config = Config::default();
        let findings = check(&db, &config);
        assert!(findings.iter().any(|f| f.name == "broken" && f.fatal));
    }

    #[test]
    fn clean_database_has_no_findings() {
        let mut db = Database::new();
        load_str(&mut db, "meter !\nfoot 0.3048 meter\n", "test", "en_US");
        let config = Config::default();
        assert!(check(&db, &config).is_empty());
    }

    #[test]
    fn flags_prefix_bodies_containing_slash() {
        let mut db = Database::new();
        db.insert_prefix(units_db::PrefixDef {
            text: "half".into(),
            body: "1/2".into(),
            location: SourceLocation::new("test", 1),
        });
        let config = Config::default();
        let findings = check(&db, &config);
        assert!(findings.iter().any(|f| f.name == "half-"));
    }

    #[test]
    fn round_trip_succeeds_for_a_clean_temperature_function() {
        let mut db = Database::new();
        db.insert_function(FunctionDef::Functional {
            name: "tempF".into(),
            forward: units_db::Branch {
                param_name: "x".into(),
                body: "(x-32)/1.8".into(),
                dimension: None,
            },
            inverse: Some(units_db::Branch {
                param_name: "x".into(),
                body: "x*1.8+32".into(),
                dimension: None,
            }),
            location: SourceLocation::new("test", 1),
        });
        let config = Config::default();
        let engine = FunctionEngine::new(&db, &config);
        assert!(engine.is_function("tempF"));
        assert!(check(&db, &config).is_empty());
    }

    #[test]
    fn the_sample_database_passes_its_own_integrity_check() {
        const SAMPLE: &str = include_str!("../../demos/units.dat");
        let mut db = Database::new();
        let report = load_str(&mut db, SAMPLE, "units.dat", "en_US");
        assert!(!report.bad_file());
        let config = Config::default();
        assert!(check(&db, &config).is_empty());
    }
}
