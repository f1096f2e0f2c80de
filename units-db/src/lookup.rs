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

//! Name resolution: exact hits, English plural de-inflection, and prefix
//! stripping.

use crate::Database;

/// Recursion guard for [`resolve`]. Plural stripping and prefix stripping
/// each shorten the candidate, so genuine inputs terminate in a handful of
/// steps; this only stops a pathological or cyclic database from looping
/// forever.
const MAX_RESOLVE_DEPTH: usize = 64;

/// Candidate singular spellings to try for a plural `name`, in the order the
/// source program tries them: strip a trailing `s`, then (if that fails)
/// strip a trailing `es`, then (if that fails) replace a trailing `ies` with
/// `y`.
fn plural_candidates(name: &str) -> Vec<String> {
    let mut candidates = Vec::with_capacity(2);
    candidates.push(name[..name.len() - 1].to_string());
    if name.ends_with("es") && name.len() > 3 {
        candidates.push(name[..name.len() - 2].to_string());
    }
    if name.ends_with("ies") && name.len() > 4 {
        candidates.push(format!("{}y", &name[..name.len() - 3]));
    }
    candidates
}

/// Resolves `name` to an unparsed expression body, or `None` if it names
/// nothing in `db`.
///
/// The result is not always a unit's literal `body`: when `name` is
/// recognized only after stripping a plural suffix, the result is the
/// *singular spelling* so that the caller re-parses a real name (see the
/// module-level plural idempotence property); when `name` is recognized
/// only after stripping a prefix, the result is the prefix's body
/// juxtaposed with the remainder, e.g. `"0.01 meter"` for `"centimeter"`.
pub fn resolve(db: &Database, name: &str, allow_prefix: bool) -> Option<String> {
    resolve_inner(db, name, allow_prefix, 0)
}

fn resolve_inner(db: &Database, name: &str, allow_prefix: bool, depth: usize) -> Option<String> {
    if depth > MAX_RESOLVE_DEPTH {
        return None;
    }

    if let Some(unit) = db.unit(name) {
        return Some(unit.body.clone());
    }

    if name.len() > 2 && name.ends_with('s') {
        for candidate in plural_candidates(name) {
            if resolve_inner(db, &candidate, allow_prefix, depth + 1).is_some() {
                return Some(candidate);
            }
        }
    }

    if allow_prefix {
        if let Some(prefix) = db.longest_prefix(name) {
            let remainder = &name[prefix.text.len()..];
            if remainder.is_empty()
                || resolve_inner(db, remainder, false, depth + 1).is_some()
            {
                return Some(format!("{} {}", prefix.body, remainder).trim_end().to_string());
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{PrefixDef, SourceLocation, UnitDef};

    fn loc() -> SourceLocation {
        SourceLocation::new("test", 1)
    }

    fn sample_db() -> Database {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: loc(),
        })
        .unwrap();
        db.insert_unit(UnitDef {
            name: "inch".into(),
            body: "2.54 cm".into(),
            primitive: false,
            dimension_tag: None,
            location: loc(),
        })
        .unwrap();
        db.insert_prefix(PrefixDef {
            text: "c".into(),
            body: "0.01".into(),
            location: loc(),
        });
        db
    }

    #[test]
    fn exact_unit_hit() {
        let db = sample_db();
        assert_eq!(resolve(&db, "meter", true), Some("!".to_string()));
    }

    #[test]
    fn plural_strip_returns_singular_spelling() {
        let db = sample_db();
        assert_eq!(resolve(&db, "meters", true), Some("meter".to_string()));
        assert_eq!(resolve(&db, "inches", true), Some("inch".to_string()));
    }

    #[test]
    fn es_and_ies_suffixes() {
        let mut db = sample_db();
        db.insert_unit(UnitDef {
            name: "box".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: loc(),
        })
        .unwrap();
        db.insert_unit(UnitDef {
            name: "candy".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: loc(),
        })
        .unwrap();
        assert_eq!(resolve(&db, "boxes", true), Some("box".to_string()));
        assert_eq!(resolve(&db, "candies", true), Some("candy".to_string()));
    }

    #[test]
    fn prefix_match_composes_body_and_remainder() {
        let db = sample_db();
        assert_eq!(resolve(&db, "cmeter", true), Some("0.01 meter".to_string()));
    }

    #[test]
    fn prefix_not_tried_when_disallowed() {
        let db = sample_db();
        assert_eq!(resolve(&db, "cmeter", false), None);
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let db = sample_db();
        assert_eq!(resolve(&db, "bogus", true), None);
    }

    #[test]
    fn resolve_is_idempotent_on_its_plural_output() {
        let db = sample_db();
        let once = resolve(&db, "meters", true).unwrap();
        let twice = resolve(&db, &once, true).unwrap();
        assert_eq!(twice, "!");
    }
}
