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

//! Symbolic atoms

use std::fmt::{self, Display};
use std::rc::Rc;

/// Sentinel atom text used to mark slots emptied by cancellation.
///
/// Consumers must treat an atom with this name as semantically absent; it is
/// kept in place (rather than removed) so that parallel numerator/denominator
/// indices stay meaningful during cancellation.
pub const CANCELLED: &str = "\0cancelled";

/// An immutable identifier naming a unit in a [`Value`](crate::Value)'s
/// numerator or denominator.
///
/// Atoms are cheaply cloned (`Rc<str>` internally) since the reducer clones
/// them freely while rewriting products.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Atom(Rc<str>);

impl Atom {
    /// Creates an atom with the given name.
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Atom(name.into())
    }

    /// Returns the cancellation sentinel atom.
    pub fn cancelled() -> Self {
        Atom::new(CANCELLED)
    }

    /// Returns the atom's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this atom is the cancellation sentinel.
    pub fn is_cancelled(&self) -> bool {
        self.0.as_ref() == CANCELLED
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Atom::new(name)
    }
}

impl From<String> for Atom {
    fn from(name: String) -> Self {
        Atom::new(name)
    }
}
