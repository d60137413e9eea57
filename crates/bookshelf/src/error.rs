//! Error types for shelf operations.
//!
//! [`ShelfError`] wraps the failures of every layer a shelf edit passes
//! through: boundary validation, geometry construction, placement checks,
//! persistence and preview export.

use std::{io, ops::Range};

use thiserror::Error;

use bookshelf_core::{item::ItemError, shelf::GeometryError};

use crate::placement::PlacementError;

/// The main error type for shelf operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the document text and the byte range of the
/// offending value, so callers can point at the problem in the source.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{message}")]
    Parse {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Invalid shelf geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Invalid shelf item: {0}")]
    Item(#[from] ItemError),

    /// A proposed placement was rejected; the message is the user-facing reason.
    #[error("{0}")]
    Placement(#[from] PlacementError),

    #[error("Storage error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl ShelfError {
    /// Create a new `Parse` error with the associated source document.
    pub fn new_parse_error(
        message: impl Into<String>,
        span: Option<Range<usize>>,
        src: impl Into<String>,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            span,
            src: src.into(),
        }
    }
}

impl From<crate::export::Error> for ShelfError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_message_is_passed_through() {
        let err = ShelfError::from(PlacementError::NoSpace);
        assert_eq!(
            err.to_string(),
            "No space available for this orientation/position"
        );
    }

    #[test]
    fn test_geometry_error_is_wrapped() {
        let err = ShelfError::from(GeometryError::InvalidGridUnit(0));
        assert!(matches!(err, ShelfError::Geometry(_)));
        assert!(err.to_string().starts_with("Invalid shelf geometry"));
    }

    #[test]
    fn test_export_error_is_boxed() {
        let err = ShelfError::from(crate::export::Error::Render("bad color".to_string()));
        assert_eq!(err.to_string(), "Export error: Render error: bad color");
    }
}
