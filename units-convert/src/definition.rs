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

//! The one-argument "what is this?" query: walk a unit's definition chain
//! down to its primitives, and describe a nonlinear function's forward (and
//! inverse, if any) form.

use units_core::{Config, Error, Value};
use units_db::{Database, FunctionDef};
use units_parser::Context;
use units_reduce::FunctionEngine;

use crate::format::{format_number, parse_format};

/// Renders `unitstr`'s definition chain, one `name = ` per non-primitive
/// link, ending in the reduced value.
pub fn show_unit_definition(db: &Database, config: &Config, unitstr: &str) -> Result<String, Error> {
    let engine = FunctionEngine::new(db, config);
    let mut ctx = Context::new(db, config, &engine);
    let parsed = units_parser::parse(unitstr, &mut ctx)?;
    let reduced = units_reduce::reduce(parsed, db, config, &engine)?;

    let mut out = String::new();
    let mut current = unitstr.trim();
    while let Some(def) = db.unit(current) {
        if def.primitive {
            break;
        }
        out.push_str(&format!("{current} = "));
        current = def.body.trim();
    }
    out.push_str(&render_value(&reduced, config));
    Ok(out)
}

/// Renders a function's forward definition (and table points, for a lookup
/// table) the way the interactive driver's one-argument query does.
pub fn show_function_definition(function: &FunctionDef, config: &Config) -> String {
    let spec = parse_format(&config.format);
    match function {
        FunctionDef::Table(table) => {
            let mut out = format!("{}: interpolated table with points\n", table.name);
            for (x, y) in &table.points {
                out.push_str(&format!(
                    "\t{}({}) = {} {}\n",
                    table.name,
                    format_number(&spec, *x),
                    format_number(&spec, *y),
                    table.co_unit
                ));
            }
            out
        }
        FunctionDef::Functional { name, forward, .. } => {
            format!("{name}({}) = {}\n", forward.param_name, forward.body)
        }
    }
}

fn render_value(value: &Value, config: &Config) -> String {
    let spec = parse_format(&config.format);
    let mut value = value.clone();
    value.sort_and_cancel();
    let numerator: Vec<&str> = value.live_numerator().map(|a| a.as_str()).collect();
    let denominator: Vec<&str> = value.live_denominator().map(|a| a.as_str()).collect();

    let mut out = format_number(&spec, value.factor);
    for name in &numerator {
        out.push(' ');
        out.push_str(name);
    }
    for name in &denominator {
        out.push_str(" /");
        out.push(' ');
        out.push_str(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_db::{load_str, Branch, SourceLocation, TableDef};

    #[test]
    fn walks_the_definition_chain_to_primitives() {
        let mut db = Database::new();
        load_str(&mut db, "meter !\nfoot 0.3048 meter\ninch foot/12\n", "test", "en_US");
        let config = Config::default();
        let rendered = show_unit_definition(&db, &config, "inch").unwrap();
        assert!(rendered.contains("inch = "));
        assert!(rendered.contains("foot/12 = "));
        assert!(rendered.contains("meter"));
    }

    #[test]
    fn renders_a_table_function_definition() {
        let function = FunctionDef::Table(TableDef {
            name: "grade".into(),
            co_unit: "percent".into(),
            points: vec![(0.0, 0.0), (1.0, 100.0)],
            location: SourceLocation::new("test", 1),
        });
        let config = Config::default();
        let rendered = show_function_definition(&function, &config);
        assert!(rendered.contains("interpolated table"));
        assert!(rendered.contains("grade(1) = 100 percent"));
    }

    #[test]
    fn renders_a_functional_form_definition() {
        let function = FunctionDef::Functional {
            name: "tempF".into(),
            forward: Branch {
                param_name: "x".into(),
                body: "(x-32)/1.8".into(),
                dimension: None,
            },
            inverse: None,
            location: SourceLocation::new("test", 1),
        };
        let config = Config::default();
        let rendered = show_function_definition(&function, &config);
        assert_eq!(rendered, "tempF(x) = (x-32)/1.8\n");
    }
}
