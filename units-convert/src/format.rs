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

//! A small `printf`-style numeric formatter, covering the `%f`, `%e` and
//! `%g` conversions that [`units_core::Config::format`] is documented to
//! accept. This is not a general `sprintf`: flags other than the precision
//! are accepted and ignored rather than honored.

/// A parsed `%[.PRECISION]CONV` specifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormatSpec {
    pub precision: usize,
    pub conversion: char,
}

/// Parses a format string such as `"%.8g"`. Anything that doesn't look like
/// a recognized specifier falls back to the default `%.6g`.
pub fn parse_format(fmt: &str) -> FormatSpec {
    let default = FormatSpec { precision: 6, conversion: 'g' };
    let Some(pct) = fmt.find('%') else {
        return default;
    };
    let mut chars = fmt[pct + 1..].chars().peekable();
    while matches!(chars.peek(), Some('-') | Some('+') | Some('0') | Some(' ') | Some('#')) {
        chars.next();
    }
    while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
        chars.next();
    }
    let mut precision = default.precision;
    if chars.peek() == Some(&'.') {
        chars.next();
        let mut digits = String::new();
        while let Some(c) = chars.peek().copied() {
            if c.is_ascii_digit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if let Ok(p) = digits.parse() {
            precision = p;
        }
    }
    let conversion = chars.next().unwrap_or(default.conversion);
    FormatSpec { precision, conversion }
}

/// Renders `value` according to `spec`.
pub fn format_number(spec: &FormatSpec, value: f64) -> String {
    match spec.conversion {
        'f' | 'F' => format!("{value:.*}", spec.precision),
        'e' => format_exp(value, spec.precision),
        'E' => format_exp(value, spec.precision).to_uppercase(),
        _ => format_g(value, spec.precision.max(1)),
    }
}

fn format_exp(value: f64, precision: usize) -> String {
    format!("{value:.*e}", precision)
}

/// `%g`: fixed notation for magnitudes the precision can represent without
/// an exponent, scientific notation otherwise, trailing zeros trimmed.
fn format_g(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    let rendered = if exponent < -4 || exponent >= precision as i32 {
        format!("{value:.*e}", precision.saturating_sub(1))
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{value:.*}", decimals)
    };
    strip_trailing_zeros(&rendered)
}

fn strip_trailing_zeros(s: &str) -> String {
    let Some(epos) = s.find(['e', 'E']) else {
        return trim_fraction(s).to_string();
    };
    let (mantissa, exponent) = s.split_at(epos);
    format!("{}{exponent}", trim_fraction(mantissa))
}

fn trim_fraction(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}
