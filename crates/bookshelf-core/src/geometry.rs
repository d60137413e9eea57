//! Geometric primitives for shelf layout.
//!
//! This module provides the interval and rectangle types the layout engine
//! uses to reason about occupied space on a shelf row.
//!
//! # Overview
//!
//! - [`Span`] - A half-open interval `[start, end)` on one axis
//! - [`Rect`] - A horizontal span paired with a depth span
//! - [`snap_to_grid`] / [`align_up`] - Grid rounding helpers
//!
//! # Coordinate System
//!
//! Each row has its own coordinate space:
//!
//! ```text
//!   depth
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► x (pixels from the row's left edge)
//! ```
//!
//! - **X-axis**: Pixels from the left edge of the row
//! - **Depth axis**: Grows with the item's depth layer (`zIndex`)
//!
//! Spans are half-open, so two items that merely touch do not overlap.

/// A half-open interval `[start, end)` on a single axis.
///
/// # Examples
///
/// ```
/// # use bookshelf_core::geometry::Span;
/// let left = Span::new(5.0, 10.0);
/// let right = Span::new(15.0, 10.0);
///
/// // Touching spans share an edge but do not overlap
/// assert!(!left.overlaps(&right));
/// assert_eq!(left.gap(&right), 0.0);
///
/// assert_eq!(left.merge(&right), Span::from_bounds(5.0, 25.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Span {
    start: f32,
    end: f32,
}

impl Span {
    /// Creates a span starting at `start` with the given length
    pub fn new(start: f32, length: f32) -> Self {
        Self {
            start,
            end: start + length,
        }
    }

    /// Creates a span from its two edges
    pub fn from_bounds(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Returns the inclusive start edge
    pub fn start(self) -> f32 {
        self.start
    }

    /// Returns the exclusive end edge
    pub fn end(self) -> f32 {
        self.end
    }

    /// Returns the length of the span
    pub fn length(self) -> f32 {
        self.end - self.start
    }

    /// Returns true if the two spans share any interior point.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the distance between the two spans.
    ///
    /// The result is zero for touching spans and negative when they overlap.
    pub fn gap(&self, other: &Self) -> f32 {
        (other.start - self.end).max(self.start - other.end)
    }

    /// Returns the smallest span containing both spans
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Projection of a shelf item onto the row plane.
///
/// The horizontal span comes from the item's position and width, the depth
/// span from its layer and height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    horizontal: Span,
    vertical: Span,
}

impl Rect {
    pub fn new(horizontal: Span, vertical: Span) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Returns the horizontal extent
    pub fn horizontal(self) -> Span {
        self.horizontal
    }

    /// Returns the depth extent
    pub fn vertical(self) -> Span {
        self.vertical
    }

    /// Returns true if the rectangles overlap on both axes
    pub fn overlaps(&self, other: &Self) -> bool {
        self.horizontal.overlaps(&other.horizontal) && self.vertical.overlaps(&other.vertical)
    }

    /// Returns true if the rectangles touch or nearly touch.
    ///
    /// Two rectangles are adjacent when they overlap, when they overlap in
    /// depth and sit at most `threshold` apart horizontally, or when they
    /// overlap horizontally and sit at most `threshold` apart in depth.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bookshelf_core::geometry::{Rect, Span};
    /// let a = Rect::new(Span::new(5.0, 10.0), Span::new(0.0, 30.0));
    /// let b = Rect::new(Span::new(18.0, 10.0), Span::new(0.0, 30.0));
    /// let far = Rect::new(Span::new(40.0, 10.0), Span::new(0.0, 30.0));
    ///
    /// assert!(a.is_adjacent(&b, 5.0));
    /// assert!(!a.is_adjacent(&far, 5.0));
    /// ```
    pub fn is_adjacent(&self, other: &Self, threshold: f32) -> bool {
        let horizontal_overlap = self.horizontal.overlaps(&other.horizontal);
        let vertical_overlap = self.vertical.overlaps(&other.vertical);

        if horizontal_overlap && vertical_overlap {
            return true;
        }
        if vertical_overlap && self.horizontal.gap(&other.horizontal) <= threshold {
            return true;
        }
        horizontal_overlap && self.vertical.gap(&other.vertical) <= threshold
    }
}

/// Rounds `value` to the nearest multiple of `grid`.
///
/// # Examples
///
/// ```
/// # use bookshelf_core::geometry::snap_to_grid;
/// assert_eq!(snap_to_grid(14.0, 10.0), 10.0);
/// assert_eq!(snap_to_grid(15.0, 10.0), 20.0);
/// assert_eq!(snap_to_grid(26.0, 10.0), 30.0);
/// ```
pub fn snap_to_grid(value: f32, grid: f32) -> f32 {
    (value / grid).round() * grid
}

/// Rounds `value` up to the next multiple of `grid`.
///
/// # Examples
///
/// ```
/// # use bookshelf_core::geometry::align_up;
/// assert_eq!(align_up(100.0, 10.0), 100.0);
/// assert_eq!(align_up(101.0, 10.0), 110.0);
/// ```
pub fn align_up(value: f32, grid: f32) -> f32 {
    (value / grid).ceil() * grid
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_span_accessors() {
        let span = Span::new(5.0, 10.0);
        assert_approx_eq!(f32, span.start(), 5.0);
        assert_approx_eq!(f32, span.end(), 15.0);
        assert_approx_eq!(f32, span.length(), 10.0);
    }

    #[test]
    fn test_span_overlap() {
        let a = Span::new(5.0, 10.0);

        assert!(a.overlaps(&Span::new(10.0, 10.0)));
        assert!(a.overlaps(&Span::new(0.0, 30.0)));
        assert!(a.overlaps(&a));

        // Touching on either side
        assert!(!a.overlaps(&Span::new(15.0, 10.0)));
        assert!(!a.overlaps(&Span::new(-5.0, 10.0)));
    }

    #[test]
    fn test_span_gap() {
        let a = Span::new(5.0, 10.0);

        assert_approx_eq!(f32, a.gap(&Span::new(20.0, 10.0)), 5.0);
        assert_approx_eq!(f32, a.gap(&Span::new(-10.0, 10.0)), 5.0);
        assert_approx_eq!(f32, a.gap(&Span::new(15.0, 10.0)), 0.0);
        assert!(a.gap(&Span::new(10.0, 10.0)) < 0.0);
    }

    #[test]
    fn test_rect_adjacent_side_by_side() {
        let a = Rect::new(Span::new(5.0, 10.0), Span::new(0.0, 30.0));
        let touching = Rect::new(Span::new(15.0, 10.0), Span::new(0.0, 30.0));
        let seam = Rect::new(Span::new(20.0, 10.0), Span::new(0.0, 30.0));
        let far = Rect::new(Span::new(21.0, 10.0), Span::new(0.0, 30.0));

        assert!(a.is_adjacent(&touching, 5.0));
        assert!(a.is_adjacent(&seam, 5.0));
        assert!(!a.is_adjacent(&far, 5.0));
    }

    #[test]
    fn test_rect_adjacent_stacked() {
        let bottom = Rect::new(Span::new(10.0, 30.0), Span::new(0.0, 10.0));
        let top = Rect::new(Span::new(20.0, 30.0), Span::new(10.0, 10.0));
        let floating = Rect::new(Span::new(20.0, 30.0), Span::new(30.0, 10.0));

        assert!(bottom.is_adjacent(&top, 5.0));
        assert!(!bottom.is_adjacent(&floating, 5.0));
    }

    #[test]
    fn test_rect_diagonal_is_not_adjacent() {
        // Close on both axes but overlapping on neither
        let a = Rect::new(Span::new(0.0, 10.0), Span::new(0.0, 10.0));
        let b = Rect::new(Span::new(11.0, 10.0), Span::new(11.0, 10.0));

        assert!(!a.is_adjacent(&b, 5.0));
    }

    #[test]
    fn test_snap_and_align() {
        assert_approx_eq!(f32, snap_to_grid(4.9, 10.0), 0.0);
        assert_approx_eq!(f32, snap_to_grid(5.0, 10.0), 10.0);
        assert_approx_eq!(f32, snap_to_grid(-4.0, 10.0), 0.0);

        assert_approx_eq!(f32, align_up(0.0, 10.0), 0.0);
        assert_approx_eq!(f32, align_up(95.5, 10.0), 100.0);
        assert_approx_eq!(f32, align_up(100.0, 10.0), 100.0);
    }
}
