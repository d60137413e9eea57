//! Drawing support for shelf previews.
//!
//! - [`ShelfLayer`]: Paint order of preview elements
//! - [`LayeredOutput`]: SVG nodes collected per layer

mod layer;

pub use layer::{LayeredOutput, ShelfLayer, SvgNode};
