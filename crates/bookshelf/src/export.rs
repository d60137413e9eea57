//! Export of shelves into viewable formats.
//!
//! # Available Backends
//!
//! - [`svg`]: SVG preview via [`svg::SvgRenderer`]
//!
//! Export operations return [`Error`], which converts into
//! [`ShelfError::Export`](crate::ShelfError::Export) at the crate boundary.

pub mod svg;

use std::io;

use thiserror::Error;

/// Errors that can occur while exporting a shelf.
#[derive(Debug, Error)]
pub enum Error {
    /// A rendering failure described by the message.
    #[error("Render error: {0}")]
    Render(String),

    /// An I/O error encountered while writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
