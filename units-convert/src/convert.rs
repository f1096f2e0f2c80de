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

//! `have` / `want` conversion: parse both sides, reduce them to primitives,
//! and divide — falling back to a reciprocal conversion when the straight
//! one isn't conformable and [`Config::strict`] allows it.

use units_core::{Config, Error, ErrorKind, Value};
use units_db::Database;
use units_parser::Context;
use units_reduce::{compareunits, FunctionEngine, IgnorePredicate};

use crate::format::{format_number, parse_format};

/// The result of converting `have` into `want`'s units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conversion {
    /// `have` expressed as a multiple of `want`.
    pub factor: f64,
    /// Set when the straight conversion wasn't conformable and the
    /// reciprocal one was used instead (`have` is conformable to `1/want`).
    pub reciprocal: bool,
}

/// Parses and reduces `have` and `want`, then reports how many `want`s make
/// up one `have`.
///
/// Non-conformable operands are reported as [`ErrorKind::BadSum`] — the same
/// kind `+`/`-` use for the analogous failure, since both describe "these
/// two dimensions don't match."
pub fn convert(db: &Database, config: &Config, have: &str, want: &str) -> Result<Conversion, Error> {
    let engine = FunctionEngine::new(db, config);
    let have_value = reduce_expr(db, config, &engine, have)?;
    let want_value = reduce_expr(db, config, &engine, want)?;

    if compareunits(&have_value, &want_value, &IgnorePredicate::Dimless, Some(db)) {
        return Ok(Conversion {
            factor: have_value.factor / want_value.factor,
            reciprocal: false,
        });
    }

    if !config.strict {
        let want_recip = want_value.clone().reciprocal();
        if compareunits(&have_value, &want_recip, &IgnorePredicate::Dimless, Some(db)) {
            return Ok(Conversion {
                factor: have_value.factor * want_value.factor,
                reciprocal: true,
            });
        }
    }

    Err(Error::new(ErrorKind::BadSum))
}

fn reduce_expr(db: &Database, config: &Config, engine: &FunctionEngine, expr: &str) -> Result<Value, Error> {
    let mut ctx = Context::new(db, config, engine);
    let parsed = units_parser::parse(expr, &mut ctx)?;
    units_reduce::reduce(parsed, db, config, engine)
}

/// Renders a [`Conversion`] the way the interactive driver prints one.
///
/// `Compact` prints the bare factor; `Normal` prints a `* factor` line and
/// (unless [`Config::one_line`]) a `/ reciprocal` line; `Verbose` also spells
/// out the `have = factor want` equation, so a transcript reads standalone.
pub fn show_answer(have_expr: &str, want_expr: &str, conversion: &Conversion, config: &Config) -> String {
    let spec = parse_format(&config.format);
    let factor = format_number(&spec, conversion.factor);
    match config.verbosity {
        units_core::Verbosity::Compact => factor,
        units_core::Verbosity::Verbose => {
            let mut out = format!("\t{have_expr} = {factor} {want_expr}\n");
            if !config.one_line {
                let reciprocal = format_number(&spec, 1.0 / conversion.factor);
                out.push_str(&format!("\t{have_expr} = (1 / {reciprocal}) {want_expr}\n"));
            }
            out
        }
        _ => {
            let mut out = format!("\t* {factor}\n");
            if !config.one_line {
                let reciprocal = format_number(&spec, 1.0 / conversion.factor);
                out.push_str(&format!("\t/ {reciprocal}\n"));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_db::{load_str, SourceLocation, UnitDef};

    fn length_db() -> Database {
        let mut db = Database::new();
        load_str(&mut db, "meter !\nfoot 0.3048 meter\ninch foot/12\n", "test", "en_US");
        db
    }

    #[test]
    fn converts_conformable_units() {
        let db = length_db();
        let config = Config::default();
        let result = convert(&db, &config, "3 foot", "meter").unwrap();
        assert!((result.factor - 0.9144).abs() < 1e-9);
        assert!(!result.reciprocal);
    }

    #[test]
    fn dimensionless_tagged_units_are_conformable_with_plain_numbers() {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "radian".into(),
            body: "!dimensionless".into(),
            primitive: true,
            dimension_tag: Some("dimensionless".into()),
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        let config = Config::default();
        let result = convert(&db, &config, "radian", "1").unwrap();
        assert!((result.factor - 1.0).abs() < 1e-12);
        assert!(!result.reciprocal);
    }

    #[test]
    fn non_conformable_units_are_reported() {
        let db = length_db();
        let config = Config::default();
        let err = convert(&db, &config, "3 foot", "3").unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadSum);
    }

    #[test]
    fn reciprocal_fallback_applies_when_not_strict() {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        let config = Config::default();
        let result = convert(&db, &config, "meter", "1/meter").unwrap();
        assert!(result.reciprocal);
        assert!((result.factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reciprocal_fallback_is_disabled_in_strict_mode() {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: SourceLocation::new("test", 1),
        })
        .unwrap();
        let mut config = Config::default();
        config.strict = true;
        let err = convert(&db, &config, "meter", "1/meter").unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadSum);
    }

    #[test]
    fn show_answer_includes_reciprocal_line_unless_one_line() {
        let config = Config::default();
        let rendered = show_answer("2 foot", "meter", &Conversion { factor: 2.0, reciprocal: false }, &config);
        assert!(rendered.contains("* 2"));
        assert!(rendered.contains("/ 0.5"));

        let mut one_line = config;
        one_line.one_line = true;
        let rendered = show_answer("2 foot", "meter", &Conversion { factor: 2.0, reciprocal: false }, &one_line);
        assert!(!rendered.contains('/'));
    }

    #[test]
    fn verbose_show_answer_spells_out_the_equation() {
        let mut config = Config::default();
        config.verbosity = units_core::Verbosity::Verbose;
        let rendered = show_answer("2 foot", "meter", &Conversion { factor: 0.6096, reciprocal: false }, &config);
        assert!(rendered.contains("2 foot = 0.6096 meter"));
    }
}
