//! Diagnostics with machine-applicable fixes.
//!
//! A rejected declaration yields exactly one [`Diagnostic`]. Its [`Fix`]
//! deletes the derivation annotation; when the annotation came from source
//! text the fix carries a concrete [`TextEdit`].

use crate::errors::ShapeError;
use proc_macro2::{LineColumn, Span, TokenStream};
use std::fmt;
use syn::Attribute;

/// 1-based line, 0-based column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<LineColumn> for Location {
    fn from(at: LineColumn) -> Self {
        Self { line: at.line, column: at.column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: Location,
    pub end: Location,
    pub replacement: String,
}

impl TextEdit {
    /// Edit deleting `attr` from the text it was parsed from.
    pub fn removing(attr: &Attribute) -> Self {
        Self {
            start: attr.pound_token.spans[0].start().into(),
            end: attr.bracket_token.span.close().end().into(),
            replacement: String::new(),
        }
    }

    /// Applies the edit. A deletion that leaves its line blank removes the
    /// whole line.
    pub fn apply(&self, source: &str) -> String {
        let (Some(mut start), Some(mut end)) =
            (byte_offset(source, self.start), byte_offset(source, self.end))
        else {
            return source.to_string();
        };
        if end < start {
            return source.to_string();
        }

        if self.replacement.is_empty() {
            let line_start = source[..start].rfind('\n').map_or(0, |index| index + 1);
            let line_end = source[end..]
                .find('\n')
                .map_or(source.len(), |index| end + index + 1);
            if source[line_start..start].trim().is_empty() && source[end..line_end].trim().is_empty() {
                start = line_start;
                end = line_end;
            }
        }

        let mut out = String::with_capacity(source.len());
        out.push_str(&source[..start]);
        out.push_str(&self.replacement);
        out.push_str(&source[end..]);
        out
    }
}

fn byte_offset(source: &str, at: Location) -> Option<usize> {
    let mut offset = 0;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        if index + 1 == at.line {
            return line
                .char_indices()
                .map(|(position, _)| offset + position)
                .chain(std::iter::once(offset + line.len()))
                .nth(at.column);
        }
        offset += line.len();
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub message: String,
    pub edit: Option<TextEdit>,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub error: ShapeError,
    pub span: Span,
    pub fix: Fix,
}

impl Diagnostic {
    pub fn rejection(error: ShapeError, span: Span, attribute: &str) -> Self {
        Self {
            message: error.headline(),
            error,
            span,
            fix: Fix {
                message: format!("Remove `#[{attribute}]`"),
                edit: None,
            },
        }
    }

    /// Re-anchors the diagnostic on the annotation and attaches its removal.
    pub fn with_annotation(mut self, annotation: &Attribute) -> Self {
        self.span = annotation.pound_token.spans[0];
        self.fix.edit = Some(TextEdit::removing(annotation));
        self
    }

    pub fn location(&self) -> Location {
        self.span.start().into()
    }

    pub fn to_compile_error(&self) -> TokenStream {
        syn::Error::new(self.span, format!("{}\nhelp: {}", self.message, self.fix.message))
            .to_compile_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.location();
        write!(
            f,
            "{}:{}: error: {}\n  fix: {}",
            at.line,
            at.column + 1,
            self.message,
            self.fix.message
        )
    }
}
