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

//! Locating the units database: explicit `-f` files first, then
//! `$HOME/.units.dat`, then `$UNITSFILE`, then the first `units.dat` found
//! on `$PATH`.

use std::env;
use std::path::{Path, PathBuf};

const PERSONAL_FILE_NAME: &str = ".units.dat";
const DEFAULT_FILE_NAME: &str = "units.dat";

/// `$HOME/.units.dat`, if it exists.
pub fn personal_units_file() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    let candidate = Path::new(&home).join(PERSONAL_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// The first `units.dat` found among `$PATH`'s directories.
pub fn default_units_file() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path).map(|dir| dir.join(DEFAULT_FILE_NAME)).find(|p| p.is_file())
}

/// The ordered list of database files the driver should load: any `-f`
/// files given explicitly, else the personal file followed by `$UNITSFILE`
/// (or, failing that, a `$PATH`-discovered default).
pub fn resolve_units_files(explicit: &[String]) -> Vec<PathBuf> {
    if !explicit.is_empty() {
        return explicit.iter().map(PathBuf::from).collect();
    }

    let mut files = Vec::new();
    if let Some(personal) = personal_units_file() {
        files.push(personal);
    }
    if let Some(env_file) = env::var_os("UNITSFILE") {
        files.push(PathBuf::from(env_file));
    } else if let Some(default) = default_units_file() {
        files.push(default);
    }
    files
}

/// `$LOCALE`, or the engine's built-in default.
pub fn locale() -> String {
    env::var("LOCALE").unwrap_or_else(|_| "en_US".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_files_take_priority_over_environment_search() {
        let files = resolve_units_files(&["a.units".to_string(), "b.units".to_string()]);
        assert_eq!(files, vec![PathBuf::from("a.units"), PathBuf::from("b.units")]);
    }

    #[test]
    fn locale_falls_back_to_en_us() {
        let saved = env::var("LOCALE").ok();
        env::remove_var("LOCALE");
        assert_eq!(locale(), "en_US");
        if let Some(value) = saved {
            env::set_var("LOCALE", value);
        }
    }
}
