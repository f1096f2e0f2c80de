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

//! The in-memory unit/prefix/function database

use std::collections::HashMap;

use crate::definition::{FunctionDef, PrefixDef, SourceLocation, UnitDef};

/// Error raised when a definition collides with one already loaded.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("'{name}' is already defined at {previous}")]
pub struct RedefinitionError {
    pub name: String,
    pub previous: SourceLocation,
}

/// The loaded unit, prefix and function tables.
///
/// Built once at startup by [`crate::loader`] and read-only thereafter; every
/// other crate in the workspace only ever sees `&Database`.
#[derive(Clone, Debug, Default)]
pub struct Database {
    units: HashMap<String, UnitDef>,
    prefixes: HashMap<u8, Vec<PrefixDef>>,
    functions: Vec<FunctionDef>,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    pub fn unit(&self, name: &str) -> Option<&UnitDef> {
        self.units.get(name)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitDef> {
        self.units.values()
    }

    pub fn insert_unit(&mut self, def: UnitDef) -> Result<(), RedefinitionError> {
        if let Some(previous) = self.units.get(&def.name) {
            return Err(RedefinitionError {
                name: def.name,
                previous: previous.location.clone(),
            });
        }
        self.units.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn insert_prefix(&mut self, def: PrefixDef) {
        let bucket = def.text.as_bytes().first().copied().unwrap_or(0);
        self.prefixes.entry(bucket).or_default().push(def);
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &PrefixDef> {
        self.prefixes.values().flatten()
    }

    /// Longest-registered-order prefix match: the first prefix (in
    /// insertion order within its first-byte bucket) whose text is a prefix
    /// of `name`. Authors declare longer prefixes before shorter ones that
    /// would otherwise shadow them.
    pub fn longest_prefix(&self, name: &str) -> Option<&PrefixDef> {
        let bucket = name.as_bytes().first().copied()?;
        self.prefixes
            .get(&bucket)?
            .iter()
            .find(|p| name.starts_with(p.text.as_str()) && !p.text.is_empty())
    }

    pub fn insert_function(&mut self, def: FunctionDef) {
        self.functions.push(def);
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name() == name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.functions.iter()
    }

    /// Every defined name: units, prefixes (with the trailing `-` restored)
    /// and functions. Used by `units-convert`'s search facilities.
    pub fn all_names(&self) -> impl Iterator<Item = String> + '_ {
        self.units
            .keys()
            .cloned()
            .chain(self.prefixes().map(|p| format!("{}-", p.text)))
            .chain(self.functions.iter().map(|f| f.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new("test", 1)
    }

    #[test]
    fn redefinition_is_rejected() {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: loc(),
        })
        .unwrap();
        let err = db
            .insert_unit(UnitDef {
                name: "meter".into(),
                body: "!".into(),
                primitive: true,
                dimension_tag: None,
                location: loc(),
            })
            .unwrap_err();
        assert_eq!(err.name, "meter");
    }

    #[test]
    fn longer_prefix_shadows_shorter_when_declared_first() {
        let mut db = Database::new();
        db.insert_prefix(PrefixDef {
            text: "kilo".into(),
            body: "1e3".into(),
            location: loc(),
        });
        db.insert_prefix(PrefixDef {
            text: "k".into(),
            body: "1e3".into(),
            location: loc(),
        });
        let matched = db.longest_prefix("kilogram").unwrap();
        assert_eq!(matched.text, "kilo");
    }
}
