//! Shelf geometry.
//!
//! A [`ShelfGeometry`] describes one bookshelf: how many rows it has, how
//! wide each row is, the grid all positions snap to and the footprint of an
//! item in each [`Orientation`]. Geometry is validated eagerly by
//! [`GeometryBuilder::build`]; a built geometry is always usable.
//!
//! # Example
//!
//! ```
//! # use bookshelf_core::shelf::{ItemDimensions, ShelfGeometry};
//! let geometry = ShelfGeometry::builder()
//!     .with_row_width(95.0)
//!     .with_row_count(2)
//!     .with_grid_unit(10)
//!     .with_padding(5.0)
//!     .with_vertical(ItemDimensions::new(10.0, 30.0))
//!     .with_horizontal(ItemDimensions::new(30.0, 10.0))
//!     .build()
//!     .expect("valid geometry");
//!
//! // Row width is aligned up to the grid
//! assert_eq!(geometry.row_width(), 100.0);
//! assert_eq!(geometry.nominal_row_width(), 95.0);
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Rect, Span, align_up, snap_to_grid},
    item::{Orientation, ShelfItem},
};

/// Errors raised when a shelf geometry is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("grid unit must be a positive integer, got {0}")]
    InvalidGridUnit(i64),

    #[error("row width must be a positive finite number, got {0}")]
    InvalidRowWidth(f32),

    #[error("padding must be a non-negative finite number, got {0}")]
    InvalidPadding(f32),

    #[error("{orientation} items need a positive width and height, got {width}x{height}")]
    InvalidDimensions {
        orientation: Orientation,
        width: f32,
        height: f32,
    },
}

/// The snapping and stepping granularity of a shelf, always positive.
///
/// # Examples
///
/// ```
/// # use bookshelf_core::shelf::GridUnit;
/// assert!(GridUnit::new(10).is_ok());
/// assert!(GridUnit::new(0).is_err());
/// assert!(GridUnit::new(-5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridUnit(NonZeroU32);

impl GridUnit {
    /// Creates a grid unit, rejecting zero, negative and oversized values.
    pub fn new(value: i64) -> Result<Self, GeometryError> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(GeometryError::InvalidGridUnit(value))
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the grid unit in pixels
    pub fn as_f32(self) -> f32 {
        self.0.get() as f32
    }
}

/// Footprint of an item in one orientation.
///
/// `width` is measured along the row, `height` along the depth axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemDimensions {
    width: f32,
    height: f32,
}

impl ItemDimensions {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Validated configuration of one shelf.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfGeometry {
    row_width: f32,
    nominal_row_width: f32,
    row_count: u32,
    grid_unit: GridUnit,
    padding: f32,
    vertical: ItemDimensions,
    horizontal: ItemDimensions,
}

impl ShelfGeometry {
    /// Returns a builder preloaded with the default shelf geometry
    pub fn builder() -> GeometryBuilder {
        GeometryBuilder::default()
    }

    /// Returns the usable row width, aligned up to the grid
    pub fn row_width(&self) -> f32 {
        self.row_width
    }

    /// Returns the row width as configured, before alignment
    pub fn nominal_row_width(&self) -> f32 {
        self.nominal_row_width
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    pub fn grid_unit(&self) -> GridUnit {
        self.grid_unit
    }

    /// Returns the grid unit in pixels
    pub fn grid(&self) -> f32 {
        self.grid_unit.as_f32()
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Returns the footprint for an orientation.
    ///
    /// [`Orientation::Unknown`] falls back to the vertical footprint.
    pub fn dimensions(&self, orientation: Orientation) -> ItemDimensions {
        match orientation {
            Orientation::Horizontal => self.horizontal,
            Orientation::Vertical | Orientation::Unknown => self.vertical,
        }
    }

    pub fn item_width(&self, orientation: Orientation) -> f32 {
        self.dimensions(orientation).width()
    }

    /// Returns the leftmost allowed position
    pub fn min_position(&self) -> f32 {
        self.padding
    }

    /// Returns the rightmost allowed position for an item of the given width
    pub fn max_position(&self, item_width: f32) -> f32 {
        self.row_width - item_width - self.padding
    }

    /// Returns true if `row` is one of this shelf's rows
    pub fn contains_row(&self, row: u32) -> bool {
        row < self.row_count
    }

    /// Returns the largest gap still considered touching: half a grid unit, at least one pixel.
    pub fn adjacency_threshold(&self) -> f32 {
        (self.grid() / 2.0).max(1.0)
    }

    /// Snaps a proposed position to the nearest grid multiple
    pub fn snap(&self, position_x: f32) -> f32 {
        snap_to_grid(position_x, self.grid())
    }

    /// Returns the horizontal extent an item occupies on its row
    pub fn item_span(&self, item: &ShelfItem) -> Span {
        Span::new(item.position_x(), self.item_width(item.orientation()))
    }

    /// Projects an item onto the row plane.
    ///
    /// The depth extent starts at `z_index × height` and is one item height tall.
    pub fn item_rect(&self, item: &ShelfItem) -> Rect {
        let dimensions = self.dimensions(item.orientation());
        let bottom = item.z_index() as f32 * dimensions.height();
        Rect::new(
            Span::new(item.position_x(), dimensions.width()),
            Span::new(bottom, dimensions.height()),
        )
    }
}

/// Builder for [`ShelfGeometry`].
///
/// Starts from the default shelf: 3 rows of 600px on a 10px grid with 10px
/// padding, 30x150 vertical items and 150x30 horizontal items.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    row_width: f32,
    row_count: u32,
    grid_unit: i64,
    padding: f32,
    vertical: ItemDimensions,
    horizontal: ItemDimensions,
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self {
            row_width: 600.0,
            row_count: 3,
            grid_unit: 10,
            padding: 10.0,
            vertical: ItemDimensions::new(30.0, 150.0),
            horizontal: ItemDimensions::new(150.0, 30.0),
        }
    }
}

impl GeometryBuilder {
    /// Set the configured row width
    pub fn with_row_width(mut self, row_width: f32) -> Self {
        self.row_width = row_width;
        self
    }

    /// Set the number of rows
    pub fn with_row_count(mut self, row_count: u32) -> Self {
        self.row_count = row_count;
        self
    }

    /// Set the grid unit; validated by [`build`](Self::build)
    pub fn with_grid_unit(mut self, grid_unit: i64) -> Self {
        self.grid_unit = grid_unit;
        self
    }

    /// Set the margin kept free at both ends of a row
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the footprint of vertical items
    pub fn with_vertical(mut self, dimensions: ItemDimensions) -> Self {
        self.vertical = dimensions;
        self
    }

    /// Set the footprint of horizontal items
    pub fn with_horizontal(mut self, dimensions: ItemDimensions) -> Self {
        self.horizontal = dimensions;
        self
    }

    /// Validates the configuration and builds the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when the grid unit is not positive, the row
    /// width is not a positive finite number, the padding is negative or an
    /// item footprint is empty.
    pub fn build(self) -> Result<ShelfGeometry, GeometryError> {
        let grid_unit = GridUnit::new(self.grid_unit)?;

        if !self.row_width.is_finite() || self.row_width <= 0.0 {
            return Err(GeometryError::InvalidRowWidth(self.row_width));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(GeometryError::InvalidPadding(self.padding));
        }
        for (orientation, dimensions) in [
            (Orientation::Vertical, self.vertical),
            (Orientation::Horizontal, self.horizontal),
        ] {
            if !dimensions.is_valid() {
                return Err(GeometryError::InvalidDimensions {
                    orientation,
                    width: dimensions.width,
                    height: dimensions.height,
                });
            }
        }

        Ok(ShelfGeometry {
            row_width: align_up(self.row_width, grid_unit.as_f32()),
            nominal_row_width: self.row_width,
            row_count: self.row_count,
            grid_unit,
            padding: self.padding,
            vertical: self.vertical,
            horizontal: self.horizontal,
        })
    }
}
