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

//! Name search and conformable-unit listing, the two lookups the
//! interactive driver offers besides a plain conversion.

use units_core::{Config, Error};
use units_db::Database;
use units_parser::Context;
use units_reduce::{compareunits, FunctionEngine, IgnorePredicate};

/// Every defined name containing `substring`, sorted.
pub fn search(db: &Database, substring: &str) -> Vec<String> {
    let mut matches: Vec<String> = db.all_names().filter(|name| name.contains(substring)).collect();
    matches.sort();
    matches
}

/// Every unit in `db` conformable to `target`, sorted. `target` is parsed
/// and reduced first so e.g. `"meter"` and `"12 foot"` find the same set.
pub fn conformable_units(db: &Database, config: &Config, target: &str) -> Result<Vec<String>, Error> {
    let engine = FunctionEngine::new(db, config);
    let target_value = {
        let mut ctx = Context::new(db, config, &engine);
        let parsed = units_parser::parse(target, &mut ctx)?;
        units_reduce::reduce(parsed, db, config, &engine)?
    };

    let mut matches = Vec::new();
    for unit in db.units() {
        let mut ctx = Context::new(db, config, &engine);
        let Ok(parsed) = units_parser::parse(&unit.name, &mut ctx) else {
            continue;
        };
        let Ok(reduced) = units_reduce::reduce(parsed, db, config, &engine) else {
            continue;
        };
        if compareunits(&reduced, &target_value, &IgnorePredicate::Dimless, Some(db)) {
            matches.push(unit.name.clone());
        }
    }
    matches.sort();
    Ok(matches)
}

/// A single page of up to `page_size` results starting at `page` (0-based).
pub fn paginate(items: &[String], page: usize, page_size: usize) -> &[String] {
    if page_size == 0 {
        return &[];
    }
    let start = (page * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_db::load_str;

    fn length_db() -> Database {
        let mut db = Database::new();
        load_str(&mut db, "meter !\nfoot 0.3048 meter\ninch foot/12\nsecond !\n", "test", "en_US");
        db
    }

    #[test]
    fn search_matches_substrings() {
        let db = length_db();
        assert_eq!(search(&db, "inch"), vec!["inch".to_string()]);
        assert_eq!(search(&db, "xyz"), Vec::<String>::new());
    }

    #[test]
    fn conformable_units_finds_length_units_only() {
        let db = length_db();
        let config = Config::default();
        let matches = conformable_units(&db, &config, "meter").unwrap();
        assert!(matches.contains(&"meter".to_string()));
        assert!(matches.contains(&"foot".to_string()));
        assert!(matches.contains(&"inch".to_string()));
        assert!(!matches.contains(&"second".to_string()));
    }

    #[test]
    fn conformable_units_includes_dimensionless_tagged_atoms() {
        let mut db = Database::new();
        load_str(&mut db, "meter !\n", "test", "en_US");
        db.insert_unit(units_db::UnitDef {
            name: "radian".into(),
            body: "!dimensionless".into(),
            primitive: true,
            dimension_tag: Some("dimensionless".into()),
            location: units_db::SourceLocation::new("test", 1),
        })
        .unwrap();
        let config = Config::default();
        let matches = conformable_units(&db, &config, "1").unwrap();
        assert!(matches.contains(&"radian".to_string()));
        assert!(!matches.contains(&"meter".to_string()));
    }

    #[test]
    fn paginate_slices_sorted_results() {
        let items: Vec<String> = vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()];
        assert_eq!(paginate(&items, 0, 2), &["a".to_string(), "b".to_string()]);
        assert_eq!(paginate(&items, 2, 2), &["e".to_string()]);
        assert_eq!(paginate(&items, 3, 2), Vec::<String>::new().as_slice());
    }
}
