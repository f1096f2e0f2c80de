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

//! Top-level orchestration: turn parsed [`Options`] into a loaded
//! [`Database`], dispatch to the requested [`Mode`], and report an exit
//! code the way the teacher program's three-way scheme does (`0` success,
//! `1` a reported error, `3` a fatal startup failure).

use std::io::{self, BufRead, Write};

use units_core::{Config, Error, ErrorKind, Value, Verbosity};
use units_db::Database;
use units_parser::{Context, FunctionEvaluator};
use units_reduce::{compareunits, FunctionEngine, IgnorePredicate};

use crate::args::{Mode, Options, Parse};
use crate::diagnostics::render_error;
use crate::locate;

pub const EXIT_OK: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_FATAL: i32 = 3;

const VERSION_LINE: &str = concat!("units ", env!("CARGO_PKG_VERSION"));

/// Built-in database used when no `-f` file is given and neither the
/// personal overlay nor `$UNITSFILE`/`$PATH` discovery finds one, so the
/// program is never left with nothing to convert against.
const BUILTIN_DATABASE: &str = include_str!("../../demos/units.dat");

const USAGE: &str = "\
Usage: units [options] [from-unit to-unit]
       units [options] -c

  -f, --file FILE           read a units file, may be repeated
  -o, --output-format FMT   printf-style numeric format (default %.8g)
  -e, --exponential         equivalent to -o %.6e
  -q, --quiet, --silent     suppress the startup unit count banner
  -v, --verbose             show the full conversion equation
      --compact             suppress the `/ reciprocal` line
  -s, --strict              disable the reciprocal-conversion fallback
  -1, --one-line            suppress the `/ reciprocal` line
  -t, --terse               -1 -q -s --compact combined
  -m, --minus                `-` is subtraction (default)
  -p, --product              `-` is unary minus in a product
      --oldstar / --newstar  precedence of `*` relative to `/`
  -c, --check                run the database integrity check and exit
      --check-verbose         like --check, but reports every finding
  -h, --help                 show this message
  -V, --version               show the version and exit
";

/// Runs the driver against `argv` (excluding the program name), using
/// standard input/output/error. Returns the process exit code.
pub fn run(argv: &[String]) -> i32 {
    let parsed = match crate::args::parse(argv) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}");
            eprint!("{USAGE}");
            return EXIT_FATAL;
        }
    };

    let options = match parsed {
        Parse::Help => {
            print!("{USAGE}");
            return EXIT_OK;
        }
        Parse::Version => {
            println!("{VERSION_LINE}");
            return EXIT_OK;
        }
        Parse::Run(options) => options,
    };

    let config = build_config(&options);
    let locale = locate::locale();
    let files = locate::resolve_units_files(&options.unit_files);

    let mut db = Database::new();
    let mut bad_file = false;
    if files.is_empty() {
        let report = units_db::load_str(&mut db, BUILTIN_DATABASE, "<builtin>", &locale);
        bad_file |= report.bad_file();
    }
    for path in &files {
        match units_db::load_file(&mut db, path, &locale) {
            Ok(report) => bad_file |= report.bad_file(),
            Err(Error { kind: ErrorKind::File(path), .. }) => {
                eprintln!("units: unable to open units file '{path}'");
                return EXIT_ERROR;
            }
            Err(e) => {
                eprintln!("units: {e}");
                return EXIT_FATAL;
            }
        }
    }

    if !options.quiet {
        println!(
            "{} units, {} prefixes, {} nonlinear units\n",
            db.units().count(),
            db.prefixes().count(),
            db.functions().count()
        );
    }
    if bad_file && options.verbose {
        eprintln!("units: one or more unit files contained errors");
    }

    match options.mode {
        Mode::Check { verbose } => run_check(&db, &config, verbose),
        Mode::Definition { have } => run_definition(&db, &config, &have),
        Mode::Convert { have, want } => run_convert(&db, &config, &have, &want),
        Mode::Interactive => run_interactive(&db, &config),
    }
}

fn build_config(options: &Options) -> Config {
    let mut config = Config::default();
    if let Some(format) = &options.format {
        config.format = format.clone();
    }
    if options.minus_set {
        config.minus = options.minus;
    }
    if options.oldstar_set {
        config.oldstar = options.oldstar;
    }
    config.strict = options.strict;
    config.one_line = options.one_line || options.compact;
    config.verbosity = if options.compact {
        Verbosity::Compact
    } else if options.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    config
}

fn run_check(db: &Database, config: &Config, verbose: bool) -> i32 {
    let findings = units_reduce::check(db, config);
    let mut fatal = false;
    for finding in &findings {
        if finding.fatal {
            fatal = true;
        } else if !verbose {
            continue;
        }
        println!("{}: {}", finding.name, finding.message);
    }
    if fatal {
        EXIT_ERROR
    } else {
        EXIT_OK
    }
}

fn run_definition(db: &Database, config: &Config, have: &str) -> i32 {
    if let Some(function) = db.find_function(have) {
        print!("{}", units_convert::show_function_definition(function, config));
        return EXIT_OK;
    }
    match units_convert::show_unit_definition(db, config, have) {
        Ok(rendered) => {
            println!("{rendered}");
            EXIT_OK
        }
        Err(e) => {
            println!("{}", render_error(have, &e));
            EXIT_ERROR
        }
    }
}

fn run_convert(db: &Database, config: &Config, have: &str, want: &str) -> i32 {
    if let Some(function) = db.find_function(want) {
        return run_function_application(db, config, have, want, function);
    }

    match units_convert::convert(db, config, have, want) {
        Ok(conversion) => {
            print!("{}", units_convert::show_answer(have, want, &conversion, config));
            EXIT_OK
        }
        Err(e) if e.kind == ErrorKind::BadSum => {
            println!("conformability error");
            print_operand_dimensions(db, config, have, want);
            EXIT_ERROR
        }
        Err(e) => {
            println!("{}", render_error(have, &e));
            EXIT_ERROR
        }
    }
}

fn run_function_application(
    db: &Database,
    config: &Config,
    have: &str,
    want: &str,
    function: &units_db::FunctionDef,
) -> i32 {
    let engine = FunctionEngine::new(db, config);
    let argument = {
        let mut ctx = Context::new(db, config, &engine);
        match units_parser::parse(have, &mut ctx).and_then(|v| units_reduce::reduce(v, db, config, &engine)) {
            Ok(v) => v,
            Err(e) => {
                println!("{}", render_error(have, &e));
                return EXIT_ERROR;
            }
        }
    };
    match engine.evaluate(want, argument, true) {
        Ok(result) => {
            let spec = units_convert::parse_format(&config.format);
            println!("\t{}", units_convert::format_number(&spec, result.factor));
            EXIT_OK
        }
        Err(e) => {
            println!("{}", render_error(have, &e));
            EXIT_ERROR
        }
    }
}

fn print_operand_dimensions(db: &Database, config: &Config, have: &str, want: &str) {
    let engine = FunctionEngine::new(db, config);
    for expr in [have, want] {
        let mut ctx = Context::new(db, config, &engine);
        if let Ok(value) = units_parser::parse(expr, &mut ctx) {
            if let Ok(reduced) = units_reduce::reduce(value, db, config, &engine) {
                println!("\t{}", describe(&reduced, config));
            }
        }
    }
}

fn describe(value: &Value, config: &Config) -> String {
    let spec = units_convert::parse_format(&config.format);
    let mut value = value.clone();
    value.sort_and_cancel();
    let mut parts = vec![units_convert::format_number(&spec, value.factor)];
    parts.extend(value.live_numerator().map(|a| a.as_str().to_string()));
    for name in value.live_denominator() {
        parts.push(format!("/{}", name.as_str()));
    }
    parts.join(" ")
}

fn run_interactive(db: &Database, config: &Config) -> i32 {
    let stdin = io::stdin();
    loop {
        let Some(have) = prompt(&stdin, "You have: ") else {
            return EXIT_OK;
        };
        if have.trim().is_empty() {
            continue;
        }
        if let Some(function) = db.find_function(have.trim()) {
            print!("{}", units_convert::show_function_definition(function, config));
            continue;
        }

        let engine = FunctionEngine::new(db, config);
        let have_value = {
            let mut ctx = Context::new(db, config, &engine);
            match units_parser::parse(have.trim(), &mut ctx).and_then(|v| units_reduce::reduce(v, db, config, &engine)) {
                Ok(v) => v,
                Err(e) => {
                    println!("{}", render_error(have.trim(), &e));
                    continue;
                }
            }
        };

        let Some(want) = prompt(&stdin, "You want: ") else {
            return EXIT_OK;
        };
        if want.trim().is_empty() {
            println!("{}", describe(&have_value, config));
            continue;
        }
        if let Some(function) = db.find_function(want.trim()) {
            match engine.evaluate(want.trim(), have_value, true) {
                Ok(result) => println!("\t{}", describe(&result, config)),
                Err(e) => println!("{}", render_error(want.trim(), &e)),
            }
            continue;
        }

        let want_value = {
            let mut ctx = Context::new(db, config, &engine);
            match units_parser::parse(want.trim(), &mut ctx).and_then(|v| units_reduce::reduce(v, db, config, &engine)) {
                Ok(v) => v,
                Err(e) => {
                    println!("{}", render_error(want.trim(), &e));
                    continue;
                }
            }
        };

        if compareunits(&have_value, &want_value, &IgnorePredicate::Dimless, Some(db)) {
            let conversion = units_convert::Conversion {
                factor: have_value.factor / want_value.factor,
                reciprocal: false,
            };
            print!("{}", units_convert::show_answer(have.trim(), want.trim(), &conversion, config));
        } else if !config.strict
            && compareunits(&have_value.clone().reciprocal(), &want_value, &IgnorePredicate::Dimless, Some(db))
        {
            let conversion = units_convert::Conversion {
                factor: have_value.factor * want_value.factor,
                reciprocal: true,
            };
            println!("reciprocal conversion");
            print!("{}", units_convert::show_answer(have.trim(), want.trim(), &conversion, config));
        } else {
            println!("conformability error");
            println!("\t{}", describe(&have_value, config));
            println!("\t{}", describe(&want_value, config));
        }
    }
}

fn prompt(stdin: &io::Stdin, text: &str) -> Option<String> {
    print!("{text}");
    io::stdout().flush().ok();
    let mut line = String::new();
    if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
        return None;
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_db::load_str;

    fn length_db() -> Database {
        let mut db = Database::new();
        load_str(&mut db, "meter !\nfoot 0.3048 meter\n", "test", "en_US");
        db
    }

    #[test]
    fn build_config_applies_terse_style_flags() {
        let mut options = Options::default();
        options.strict = true;
        options.one_line = true;
        options.compact = true;
        let config = build_config(&options);
        assert!(config.strict);
        assert!(config.one_line);
        assert_eq!(config.verbosity, Verbosity::Compact);
    }

    #[test]
    fn run_definition_reports_a_reduced_unit() {
        let db = length_db();
        let config = Config::default();
        assert_eq!(run_definition(&db, &config, "foot"), EXIT_OK);
    }

    #[test]
    fn builtin_database_loads_without_recoverable_errors() {
        let mut db = Database::new();
        let report = load_str(&mut db, BUILTIN_DATABASE, "<builtin>", "en_US");
        assert!(!report.bad_file());
        assert!(db.unit("meter").is_some());
        assert!(db.find_function("tempF").is_some());
    }

    #[test]
    fn run_convert_reports_conformability_errors() {
        let db = length_db();
        let config = Config::default();
        assert_eq!(run_convert(&db, &config, "3", "foot"), EXIT_ERROR);
    }
}
