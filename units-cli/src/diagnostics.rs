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

//! Caret diagnostics for parse errors, replacing the teacher's `^` printed
//! by hand under the offending character with `annotate-snippets`.

use std::ops::Range;

use annotate_snippets::{Level, Renderer, Snippet};
use units_core::Error;

/// Renders `error` against `source`. Errors without a byte location (most
/// of the taxonomy besides [`units_core::ErrorKind::Parse`] and
/// [`units_core::ErrorKind::UnknownUnit`]) fall back to a bare message.
pub fn render_error(source: &str, error: &Error) -> String {
    let message = error.kind.to_string();
    let Some(location) = &error.location else {
        return message;
    };
    let span = clamp_span(source, location);
    let snippet = Level::Error
        .title(&message)
        .snippet(Snippet::source(source).line_start(1).annotation(Level::Error.span(span).label("here")));
    let rendered = Renderer::plain().render(snippet).to_string();
    rendered
}

fn clamp_span(source: &str, location: &Range<usize>) -> Range<usize> {
    let len = source.len();
    let start = location.start.min(len);
    let end = location.end.max(start + 1).min(len.max(start + 1));
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::ErrorKind;

    #[test]
    fn error_without_location_is_its_bare_message() {
        let error = Error::new(ErrorKind::NotANumber);
        assert_eq!(render_error("3 + meter", &error), "not a number");
    }

    #[test]
    fn error_with_location_points_at_the_offending_span() {
        let error = Error::at(ErrorKind::UnknownUnit("furlong".to_string()), 4..11);
        let rendered = render_error("3 + furlong", &error);
        assert!(rendered.contains("unknown unit"));
        assert!(rendered.contains("furlong"));
    }
}
