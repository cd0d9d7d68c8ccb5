// This file is part of aexpr, an infix expression parser and evaluator.
// Copyright (C) 2026 aexpr contributors
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

//! Caret-annotated diagnostic rendering, the `perror` of this crate.
//!
//! Mirrors the reference implementation's source-snippet renderer: a
//! one-line title plus, when the failure has a byte span, the offending
//! slice of the expression with a caret under it.

use std::io::{self, Write};
use std::ops::Range;

use annotate_snippets::{Level, Renderer, Snippet};

use crate::error::{BuildError, EvalError};

/// Anything that can be rendered as a caret diagnostic against the original
/// expression text: a message, and an optional byte span into `source`.
pub trait Diagnostic {
    fn message(&self) -> String;
    fn span(&self) -> Option<Range<usize>>;
}

impl Diagnostic for BuildError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Range<usize>> {
        BuildError::span(self)
    }
}

impl Diagnostic for EvalError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn span(&self) -> Option<Range<usize>> {
        EvalError::span(self)
    }
}

/// Writes `prefix: message` to `w`, followed by a caret-annotated source
/// snippet when `error` carries a byte span into `source`.
pub fn write_report(
    w: &mut impl Write,
    prefix: &str,
    source: &str,
    error: &dyn Diagnostic,
) -> io::Result<()> {
    let message = error.message();
    let Some(span) = error.span() else {
        return writeln!(w, "{prefix}: {message}");
    };

    // annotate-snippets panics on an out-of-bounds or empty span; an empty
    // span (end-of-input errors) is widened by one so there is something to
    // point the caret at.
    let span = if span.start >= source.len() || span.is_empty() {
        let at = span.start.min(source.len().saturating_sub(1));
        at..(at + 1).min(source.len().max(1))
    } else {
        span
    };

    let title = format!("{prefix}: {message}");
    let report = Level::Error.title(&title).snippet(
        Snippet::source(source)
            .line_start(1)
            .annotation(Level::Error.span(span).label(&message)),
    );
    let rendered = Renderer::plain().render(report);
    writeln!(w, "{rendered}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_message_only_when_no_span() {
        let mut buf = Vec::new();
        write_report(&mut buf, "aexpr", "1+", &BuildError::AlreadyBuilt).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("already owns"));
    }

    #[test]
    fn renders_caret_snippet_for_spanned_errors() {
        let mut buf = Vec::new();
        let err = BuildError::UnrecognisedToken { at: 1..2 };
        write_report(&mut buf, "aexpr", "1&2", &err).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("unrecognised token"));
        assert!(text.contains('1'));
    }
}
