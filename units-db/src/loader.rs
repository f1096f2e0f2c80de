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

//! Database source text → [`Database`]
//!
//! Line semantics: trailing-backslash continuations are joined before `#`
//! comments are stripped; a line beginning with `!` at column 0 is a
//! directive (`!include`, `!locale`, `!endlocale`); anything else is a
//! definition whose name shape (`foo-`, `foo[X]`, `foo(p)`, `foo`) selects
//! whether it becomes a prefix, table, function, or unit.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use units_core::{Error, ErrorKind};

use crate::database::Database;
use crate::definition::{Branch, FunctionDef, PrefixDef, SourceLocation, TableDef, UnitDef};

/// How deep `!include` may nest before the loader gives up.
pub const MAX_INCLUDE_DEPTH: usize = 5;

/// A recoverable problem found while loading a database file.
///
/// Recoverable errors don't abort the load: the loader records them here and
/// moves on to the next line, matching the teacher program's append-and-
/// continue philosophy for bad input.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct LoadError {
    pub location: SourceLocation,
    pub message: String,
}

/// Summary of a (possibly multi-file) database load.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
}

impl LoadReport {
    /// The `BAD_FILE` flag: whether any recoverable error was recorded.
    pub fn bad_file(&self) -> bool {
        !self.errors.is_empty()
    }
}

struct Loader<'a> {
    db: &'a mut Database,
    report: LoadReport,
    locale: String,
}

/// Loads a single database file (plus any files it `!include`s) into `db`.
pub fn load_file(db: &mut Database, path: &Path, locale: &str) -> Result<LoadReport, Error> {
    let mut loader = Loader {
        db,
        report: LoadReport::default(),
        locale: locale.to_string(),
    };
    loader.load_file(path, 0)?;
    Ok(loader.report)
}

/// Loads database text that has no filesystem identity (e.g. an embedded
/// default database). `!include` directives are reported as recoverable
/// errors since there is no base directory to resolve them against.
pub fn load_str(db: &mut Database, text: &str, source_name: &str, locale: &str) -> LoadReport {
    let mut loader = Loader {
        db,
        report: LoadReport::default(),
        locale: locale.to_string(),
    };
    loader.load_text(text, source_name, None, 0);
    loader.report
}

impl Loader<'_> {
    fn load_file(&mut self, path: &Path, depth: usize) -> Result<(), Error> {
        let text = fs::read_to_string(path)
            .map_err(|_| Error::new(ErrorKind::File(path.display().to_string())))?;
        let name: Rc<str> = path.display().to_string().into();
        let base_dir = path.parent().map(Path::to_path_buf);
        self.load_text(&text, &name, base_dir.as_deref(), depth);
        Ok(())
    }

    fn load_text(&mut self, text: &str, source_name: &str, base_dir: Option<&Path>, depth: usize) {
        let source_name: Rc<str> = source_name.into();
        let mut in_locale_block: Option<(String, bool)> = None; // (name, matches)

        for (logical_line, start_line) in join_continuations(text) {
            let location = SourceLocation::new(source_name.clone(), start_line);
            let without_comment = strip_comment(&logical_line);
            let trimmed = without_comment.trim();
            if trimmed.is_empty() {
                continue;
            }

            if without_comment.starts_with('!') {
                self.handle_directive(
                    trimmed,
                    &location,
                    base_dir,
                    depth,
                    &mut in_locale_block,
                );
                continue;
            }

            if let Some((_, matches)) = &in_locale_block {
                if !matches {
                    continue;
                }
            }

            self.handle_definition(trimmed, &location);
        }
    }

    fn handle_directive(
        &mut self,
        line: &str,
        location: &SourceLocation,
        base_dir: Option<&Path>,
        depth: usize,
        in_locale_block: &mut Option<(String, bool)>,
    ) {
        let line = &line[1..]; // drop leading '!'
        let mut parts = line.splitn(2, char::is_whitespace);
        let keyword = parts.next().unwrap_or("");
        let argument = parts.next().unwrap_or("").trim();

        match keyword {
            "include" => {
                if in_locale_block.as_ref().is_some_and(|(_, m)| !m) {
                    return;
                }
                if depth + 1 > MAX_INCLUDE_DEPTH {
                    self.report.errors.push(LoadError {
                        location: location.clone(),
                        message: format!("!include nested past depth {MAX_INCLUDE_DEPTH}"),
                    });
                    return;
                }
                let path = resolve_include_path(argument, base_dir);
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        let name: Rc<str> = path.display().to_string().into();
                        let next_base = path.parent().map(Path::to_path_buf);
                        self.load_text(&text, &name, next_base.as_deref(), depth + 1);
                    }
                    Err(_) => self.report.errors.push(LoadError {
                        location: location.clone(),
                        message: format!("cannot open included file '{}'", path.display()),
                    }),
                }
            }
            "locale" => {
                if in_locale_block.is_some() {
                    self.report.errors.push(LoadError {
                        location: location.clone(),
                        message: "!locale blocks may not nest".to_string(),
                    });
                    return;
                }
                let matches = argument == self.locale;
                *in_locale_block = Some((argument.to_string(), matches));
            }
            "endlocale" => {
                if in_locale_block.take().is_none() {
                    self.report.errors.push(LoadError {
                        location: location.clone(),
                        message: "!endlocale without matching !locale".to_string(),
                    });
                }
            }
            other => self.report.errors.push(LoadError {
                location: location.clone(),
                message: format!("unknown directive '!{other}'"),
            }),
        }
    }

    fn handle_definition(&mut self, line: &str, location: &SourceLocation) {
        let mut parts = line.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let body = parts.next().unwrap_or("").trim();

        if name.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            self.error(location, format!("illegal name '{name}'"));
            return;
        }

        if let Some(prefix_text) = name.strip_suffix('-') {
            if body.is_empty() {
                self.error(location, format!("prefix '{name}' has no body"));
                return;
            }
            self.db.insert_prefix(PrefixDef {
                text: prefix_text.to_string(),
                body: body.to_string(),
                location: location.clone(),
            });
            return;
        }

        if let Some((base, co_unit)) = parse_table_head(name) {
            self.load_table(base, co_unit, body, location);
            return;
        }

        if let Some((base, param)) = parse_function_head(name) {
            self.load_function(base, param, body, location);
            return;
        }

        if body.is_empty() {
            self.error(location, format!("unit '{name}' has no body"));
            return;
        }
        if name.ends_with(|c: char| ('2'..='9').contains(&c)) {
            self.error(
                location,
                format!("unit name '{name}' ends in a digit 2-9 and would be unreachable"),
            );
            return;
        }

        let primitive = body.contains(units_core::PRIMITIVE_MARK);
        let dimension_tag = primitive
            .then(|| body.splitn(2, units_core::PRIMITIVE_MARK).nth(1))
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let def = UnitDef {
            name: name.to_string(),
            body: body.to_string(),
            primitive,
            dimension_tag,
            location: location.clone(),
        };
        if let Err(e) = self.db.insert_unit(def) {
            self.error(location, e.to_string());
        }
    }

    fn load_table(&mut self, name: &str, co_unit: &str, body: &str, location: &SourceLocation) {
        let mut points = Vec::new();
        let numbers: Vec<&str> = body
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        if numbers.len() % 2 != 0 || numbers.is_empty() {
            self.error(location, format!("table '{name}' has an odd number of values"));
            return;
        }
        for pair in numbers.chunks(2) {
            let (Ok(x), Ok(y)) = (pair[0].parse::<f64>(), pair[1].parse::<f64>()) else {
                self.error(location, format!("table '{name}' has a non-numeric entry"));
                return;
            };
            points.push((x, y));
        }
        if points.windows(2).any(|w| w[0].0 >= w[1].0) {
            self.error(location, format!("table '{name}' is not strictly increasing in x"));
            return;
        }
        self.db.insert_function(FunctionDef::Table(TableDef {
            name: name.to_string(),
            co_unit: co_unit.to_string(),
            points,
            location: location.clone(),
        }));
    }

    fn load_function(&mut self, name: &str, param: &str, body: &str, location: &SourceLocation) {
        let Some((dim_spec, rest)) = body
            .strip_prefix('[')
            .and_then(|s| s.split_once(']'))
        else {
            self.error(location, format!("function '{name}' is missing a [DIM] spec"));
            return;
        };
        let (dim_in, dim_out) = match dim_spec.split_once(';') {
            Some((a, b)) => (non_empty(a), non_empty(b)),
            None => (non_empty(dim_spec), non_empty(dim_spec)),
        };

        let mut branches = rest.splitn(2, ';');
        let forward_body = branches.next().unwrap_or("").trim();
        let inverse_body = branches.next().map(str::trim).filter(|s| !s.is_empty());
        if forward_body.is_empty() {
            self.error(location, format!("function '{name}' has no forward body"));
            return;
        }

        let forward = Branch {
            param_name: param.to_string(),
            body: forward_body.to_string(),
            dimension: dim_in,
        };
        let inverse = inverse_body.map(|b| Branch {
            param_name: param.to_string(),
            body: b.to_string(),
            dimension: dim_out,
        });

        self.db.insert_function(FunctionDef::Functional {
            name: name.to_string(),
            forward,
            inverse,
            location: location.clone(),
        });
    }

    fn error(&mut self, location: &SourceLocation, message: String) {
        self.report.errors.push(LoadError {
            location: location.clone(),
            message,
        });
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Splits `foo[X]` into `("foo", "X")`.
fn parse_table_head(name: &str) -> Option<(&str, &str)> {
    let base = name.strip_suffix(']')?;
    let (base, co_unit) = base.split_once('[')?;
    (!base.is_empty() && !co_unit.is_empty()).then_some((base, co_unit))
}

/// Splits `foo(p)` into `("foo", "p")`.
fn parse_function_head(name: &str) -> Option<(&str, &str)> {
    let base = name.strip_suffix(')')?;
    let (base, param) = base.split_once('(')?;
    (!base.is_empty() && !param.is_empty()).then_some((base, param))
}

/// Strips a `#` end-of-line comment, if any.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Joins lines ending in a trailing backslash with the line that follows,
/// yielding `(logical_line, first_physical_line_number)` pairs, 1-indexed.
fn join_continuations(text: &str) -> Vec<(String, usize)> {
    let mut result = Vec::new();
    let mut pending = String::new();
    let mut pending_start = 0usize;

    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        if pending.is_empty() {
            pending_start = line_number;
        }
        if let Some(stripped) = raw_line.strip_suffix('\\') {
            pending.push_str(stripped);
            continue;
        }
        pending.push_str(raw_line);
        result.push((std::mem::take(&mut pending), pending_start));
    }
    if !pending.is_empty() {
        result.push((pending, pending_start));
    }
    result
}

fn resolve_include_path(argument: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(argument);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match base_dir {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_backslash_continuations() {
        let joined = join_continuations("a b \\\nc d\ne f");
        assert_eq!(joined[0].0, "a b c d");
        assert_eq!(joined[0].1, 1);
        assert_eq!(joined[1].0, "e f");
        assert_eq!(joined[1].1, 3);
    }

    #[test]
    fn loads_units_prefixes_and_comments() {
        let mut db = Database::new();
        let text = "\
meter !
cm- 0.01
# this is a comment
inch 2.54 cm
";
        let report = load_str(&mut db, text, "test", "en_US");
        assert!(!report.bad_file());
        assert!(db.unit("meter").unwrap().primitive);
        assert_eq!(db.unit("inch").unwrap().body, "2.54 cm");
        assert_eq!(db.longest_prefix("cmeter").unwrap().text, "c");
    }

    #[test]
    fn locale_blocks_are_filtered() {
        let mut db = Database::new();
        let text = "\
!locale fr_FR
metre !
!endlocale
!locale en_US
meter !
!endlocale
";
        let report = load_str(&mut db, text, "test", "en_US");
        assert!(!report.bad_file());
        assert!(db.unit("meter").is_some());
        assert!(db.unit("metre").is_none());
    }

    #[test]
    fn redefinition_is_reported_non_fatally() {
        let mut db = Database::new();
        let text = "meter !\nmeter !\n";
        let report = load_str(&mut db, text, "test", "en_US");
        assert!(report.bad_file());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn table_and_function_shapes_are_recognized() {
        let mut db = Database::new();
        let text = "\
tempC !
tempF(x) [tempC] (x-32)/1.8; x*1.8+32
grade[percent] 0 0, 1 100
";
        let report = load_str(&mut db, text, "test", "en_US");
        assert!(!report.bad_file());
        assert!(matches!(
            db.find_function("tempF"),
            Some(FunctionDef::Functional { .. })
        ));
        assert!(matches!(
            db.find_function("grade"),
            Some(FunctionDef::Table(_))
        ));
    }

    #[test]
    fn unit_name_ending_in_digit_is_rejected() {
        let mut db = Database::new();
        let report = load_str(&mut db, "foo2 !\n", "test", "en_US");
        assert!(report.bad_file());
        assert!(db.unit("foo2").is_none());
    }
}
