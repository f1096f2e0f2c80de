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

//! Engine-wide configuration
//!
//! Everything here used to live in process-wide globals in the program this
//! crate is modeled on (`irreducible_name`, a lookup scratch buffer, the
//! function-parameter slot). Per the project's design notes, those became an
//! explicit record threaded through the parser and reducer instead, so the
//! engine composes correctly under nested function application and remains
//! safe to use from more than one caller.

/// Output verbosity level, controlling how much prefix text `units-convert`
/// puts on each output line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verbosity {
    /// Print only the bare numbers.
    Compact,
    /// Print one labeled line per number (the default).
    Normal,
    /// Print the reduced forms of both operands as well.
    Verbose,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Normal
    }
}

/// Behavior switches that affect parsing, reduction, and output formatting.
///
/// A `Config` is built once (typically from CLI flags) and then passed by
/// reference through parsing, reduction, and conversion; it never mutates
/// after construction.
#[derive(Clone, Debug)]
pub struct Config {
    /// Whether `-` means subtraction (`true`) rather than unary-minus-only
    /// product juxtaposition.
    pub minus: bool,
    /// Whether `*` binds tighter than `/` (the historical `--oldstar`
    /// convention) rather than the two sharing precedence.
    pub oldstar: bool,
    /// Disables the reciprocal-conversion fallback.
    pub strict: bool,
    /// Suppresses the reciprocal-factor line of a conversion.
    pub one_line: bool,
    pub verbosity: Verbosity,
    /// `printf`-style numeric format, e.g. `"%.8g"`.
    pub format: String,
    /// Locale name selecting `!locale` blocks in database sources.
    pub locale: String,
    /// Maximum recursion depth the parser allows before returning
    /// [`units_core::ErrorKind::ParseMem`](crate::ErrorKind::ParseMem).
    pub parse_depth_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            minus: true,
            oldstar: false,
            strict: false,
            one_line: false,
            verbosity: Verbosity::default(),
            format: "%.8g".to_string(),
            locale: "en_US".to_string(),
            parse_depth_limit: 800,
        }
    }
}
