//! Error adapter for converting ShelfError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Parse errors carry the shelf document and the offending byte range, so
//! they are rendered with a source snippet. All other errors are rendered as
//! plain reports with an error code and, where one exists, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use bookshelf::{ShelfError, placement::PlacementError};

/// Adapter for a [`ShelfError::Parse`] error with its source document.
pub struct ParseAdapter<'a> {
    message: &'a str,
    span: Option<SourceSpan>,
    src: &'a str,
}

impl<'a> ParseAdapter<'a> {
    /// Create a new parse adapter.
    pub fn new(message: &'a str, span: Option<SourceSpan>, src: &'a str) -> Self {
        Self { message, span, src }
    }
}

impl fmt::Debug for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseAdapter")
            .field("message", &self.message)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for ParseAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseAdapter<'_> {}

impl MietteDiagnostic for ParseAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("bookshelf::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

/// Adapter for [`ShelfError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a ShelfError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ShelfError::Io(_) => "bookshelf::io",
            ShelfError::Parse { .. } => "bookshelf::parse",
            ShelfError::Geometry(_) => "bookshelf::geometry",
            ShelfError::Item(_) => "bookshelf::item",
            ShelfError::Placement(_) => "bookshelf::placement",
            ShelfError::Store(_) => "bookshelf::store",
            ShelfError::Config(_) => "bookshelf::config",
            ShelfError::Export(_) => "bookshelf::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ShelfError::Placement(PlacementError::NoSpace) => {
                "try another position or row, or turn the item"
            }
            ShelfError::Placement(PlacementError::Unsupported) => {
                "put the item on the front layer, or above items on a lower layer"
            }
            ShelfError::Geometry(_) => "check the [geometry] table or the [shelf] configuration",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parse error with source location information.
    Parse(ParseAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Parse(p) => fmt::Display::fmt(p, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Parse(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Parse(p) => p.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Parse(p) => p.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Parse(p) => p.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`ShelfError`] into a list of reportable errors.
pub fn to_reportables(err: &ShelfError) -> Vec<Reportable<'_>> {
    match err {
        ShelfError::Parse { message, span, src } => {
            let span = span
                .as_ref()
                .map(|range| SourceSpan::new(range.start.into(), range.len()));
            vec![Reportable::Parse(ParseAdapter::new(message, span, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use bookshelf::shelf::GeometryError;

    use super::*;

    #[test]
    fn test_parse_error_has_label() {
        let err = ShelfError::new_parse_error("invalid string", Some(5..8), "id = !!!");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Parse(p) => {
                assert_eq!(p.to_string(), "invalid string");
                let labels: Vec<_> = p.labels().unwrap().collect();
                assert_eq!(labels.len(), 1);
                assert!(labels[0].primary());
                assert_eq!(labels[0].offset(), 5);
                assert_eq!(labels[0].len(), 3);
            }
            Reportable::Error(_) => panic!("Expected Parse"),
        }
    }

    #[test]
    fn test_parse_error_without_span() {
        let err = ShelfError::new_parse_error("bad document", None, "");

        let reportables = to_reportables(&err);
        assert!(reportables[0].labels().is_none());
    }

    #[test]
    fn test_placement_error_code_and_help() {
        let err = ShelfError::Placement(PlacementError::Unsupported);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Horizontal books need support from the grid below."
                );
                assert_eq!(e.code().unwrap().to_string(), "bookshelf::placement");
                assert!(e.help().is_some());
            }
            Reportable::Parse(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_geometry_error_code() {
        let err = ShelfError::Geometry(GeometryError::InvalidGridUnit(0));

        let reportables = to_reportables(&err);
        assert_eq!(
            reportables[0].code().unwrap().to_string(),
            "bookshelf::geometry"
        );
    }

    #[test]
    fn test_store_error_has_no_help() {
        let err = ShelfError::Store("disk full".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].to_string(), "Storage error: disk full");
        assert!(reportables[0].help().is_none());
    }
}
