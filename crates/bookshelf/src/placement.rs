//! Placement validation for moves and orientation changes.
//!
//! A proposed placement passes three checks, in order:
//!
//! 1. **Bounds**: the row exists and the item fits between the paddings.
//! 2. **Overlap**: the item's span does not intersect a blocking item.
//!    Vertical items are blocked by every item on the row; horizontal items
//!    only by items on their own depth layer.
//! 3. **Support**: a horizontal item above the front layer rests on items
//!    from lower layers across every grid cell it spans.
//!
//! Rejections are ordinary values; callers are expected to branch on them on
//! every pointer move.

use log::{debug, trace};
use thiserror::Error;

use bookshelf_core::{
    geometry::Span,
    identifier::ItemId,
    item::{Orientation, ShelfItem},
    shelf::ShelfGeometry,
};

/// Reasons a placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("No space available for this orientation/position")]
    NoSpace,

    #[error("Horizontal books need support from the grid below.")]
    Unsupported,

    #[error("Item `{0}` is not on this shelf")]
    UnknownItem(ItemId),
}

/// A proposed position for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    item_id: ItemId,
    row_index: u32,
    position_x: f32,
    orientation: Orientation,
    z_index: u32,
}

impl PlacementRequest {
    /// Creates a request for a vertical item on the front layer
    pub fn new(item_id: impl Into<ItemId>, row_index: u32, position_x: f32) -> Self {
        Self {
            item_id: item_id.into(),
            row_index,
            position_x,
            orientation: Orientation::Vertical,
            z_index: 0,
        }
    }

    /// Creates a request that keeps the item exactly where it is
    pub fn for_item(item: &ShelfItem) -> Self {
        Self {
            item_id: item.id().clone(),
            row_index: item.row_index(),
            position_x: item.position_x(),
            orientation: item.orientation(),
            z_index: item.z_index(),
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_position(mut self, row_index: u32, position_x: f32) -> Self {
        self.row_index = row_index;
        self.position_x = position_x;
        self
    }

    /// Returns the request with its position snapped to the nearest grid multiple.
    pub fn snapped(mut self, geometry: &ShelfGeometry) -> Self {
        self.position_x = geometry.snap(self.position_x);
        self
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn row_index(&self) -> u32 {
        self.row_index
    }

    pub fn position_x(&self) -> f32 {
        self.position_x
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    fn span(&self, geometry: &ShelfGeometry) -> Span {
        Span::new(self.position_x, geometry.item_width(self.orientation))
    }

    /// Applies the request to `item`, keeping its identity and series
    fn apply_to(&self, item: &ShelfItem) -> ShelfItem {
        item.clone()
            .with_placement(self.row_index, self.position_x)
            .with_orientation(self.orientation)
            .with_z_index(self.z_index)
    }
}

/// Checks whether `request` describes a valid placement among `items`.
///
/// The moving item is identified by the request's id and never blocks or
/// supports itself. The request position is used as given; see
/// [`plan_move`] for the snapping variant.
///
/// # Errors
///
/// - [`PlacementError::NoSpace`] when the target is out of bounds or overlaps a blocking item.
/// - [`PlacementError::Unsupported`] when an elevated horizontal item has a cell with nothing below it.
///
/// # Examples
///
/// ```
/// # use bookshelf::placement::{PlacementError, PlacementRequest, validate_placement};
/// # use bookshelf_core::{item::{Orientation, ShelfItem}, shelf::ShelfGeometry};
/// let geometry = ShelfGeometry::builder().build().unwrap();
/// let items = vec![ShelfItem::new("a", 0, 10.0)];
///
/// let flat = PlacementRequest::for_item(&items[0]).with_orientation(Orientation::Horizontal);
/// assert_eq!(validate_placement(&items, &geometry, &flat), Ok(()));
///
/// let floating = flat.with_z_index(1);
/// assert_eq!(
///     validate_placement(&items, &geometry, &floating),
///     Err(PlacementError::Unsupported)
/// );
/// ```
pub fn validate_placement(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    request: &PlacementRequest,
) -> Result<(), PlacementError> {
    let result = check_bounds(geometry, request)
        .and_then(|()| check_overlap(items, geometry, request))
        .and_then(|()| check_support(items, geometry, request));

    match &result {
        Ok(()) => trace!(item_id = request.item_id.as_str(); "Placement accepted"),
        Err(err) => debug!(
            item_id = request.item_id.as_str(),
            row = request.row_index,
            position_x = request.position_x,
            reason:% = err;
            "Placement rejected"
        ),
    }
    result
}

fn check_bounds(geometry: &ShelfGeometry, request: &PlacementRequest) -> Result<(), PlacementError> {
    if !geometry.contains_row(request.row_index) {
        return Err(PlacementError::NoSpace);
    }

    let width = geometry.item_width(request.orientation);
    let position_x = request.position_x;
    if position_x < geometry.min_position() || position_x > geometry.max_position(width) {
        return Err(PlacementError::NoSpace);
    }
    Ok(())
}

fn check_overlap(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    request: &PlacementRequest,
) -> Result<(), PlacementError> {
    let target = request.span(geometry);

    let blocked = row_neighbours(items, request)
        .filter(|item| match request.orientation {
            // Flat books at other depths may share the same horizontal range
            Orientation::Horizontal => item.z_index() == request.z_index,
            Orientation::Vertical | Orientation::Unknown => true,
        })
        .any(|item| geometry.item_span(item).overlaps(&target));

    if blocked {
        Err(PlacementError::NoSpace)
    } else {
        Ok(())
    }
}

fn check_support(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    request: &PlacementRequest,
) -> Result<(), PlacementError> {
    if request.orientation != Orientation::Horizontal || request.z_index == 0 {
        return Ok(());
    }

    let below: Vec<Span> = row_neighbours(items, request)
        .filter(|item| item.z_index() < request.z_index)
        .map(|item| geometry.item_span(item))
        .collect();

    let grid = geometry.grid();
    let target = request.span(geometry);
    let cells = (target.length() / grid).ceil() as u32;

    for cell in 0..cells {
        let start = target.start() + cell as f32 * grid;
        let cell_span = Span::from_bounds(start, (start + grid).min(target.end()));
        if !below.iter().any(|span| span.overlaps(&cell_span)) {
            trace!(cell, start; "Unsupported grid cell");
            return Err(PlacementError::Unsupported);
        }
    }
    Ok(())
}

/// Items sharing the request's row, excluding the moving item itself
fn row_neighbours<'a>(
    items: &'a [ShelfItem],
    request: &'a PlacementRequest,
) -> impl Iterator<Item = &'a ShelfItem> + 'a {
    items
        .iter()
        .filter(move |item| item.row_index() == request.row_index && *item.id() != request.item_id)
}

/// Snaps and validates a drag-and-drop move, returning the moved item.
///
/// Snapping rounds to the nearest multiple of the grid unit counted from
/// zero, not from the padding. With a padding that is not itself a grid
/// multiple, a position returned by
/// [`find_next_available_slot`](crate::slot::find_next_available_slot)
/// may snap onto a different cell; validate such a position directly with
/// [`validate_placement`] instead.
///
/// # Errors
///
/// Returns [`PlacementError::UnknownItem`] if the request names an item not
/// in `items`, or the validation error for the snapped position.
pub fn plan_move(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    request: PlacementRequest,
) -> Result<ShelfItem, PlacementError> {
    let item = find_item(items, &request.item_id)?;
    let request = request.snapped(geometry);

    validate_placement(items, geometry, &request)?;
    Ok(request.apply_to(item))
}

/// Validates turning an item in place, returning the updated item.
///
/// The item keeps its row, position and depth; only its footprint changes.
///
/// # Errors
///
/// Returns [`PlacementError::UnknownItem`] if `item_id` is not in `items`,
/// or the validation error for the new orientation.
pub fn plan_orientation_change(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    item_id: &ItemId,
    orientation: Orientation,
) -> Result<ShelfItem, PlacementError> {
    let item = find_item(items, item_id)?;
    let request = PlacementRequest::for_item(item).with_orientation(orientation);

    validate_placement(items, geometry, &request)?;
    Ok(request.apply_to(item))
}

fn find_item<'a>(items: &'a [ShelfItem], item_id: &ItemId) -> Result<&'a ShelfItem, PlacementError> {
    items
        .iter()
        .find(|item| item.id() == item_id)
        .ok_or_else(|| PlacementError::UnknownItem(item_id.clone()))
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use bookshelf_core::shelf::ItemDimensions;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn geometry() -> ShelfGeometry {
        ShelfGeometry::builder()
            .with_row_width(200.0)
            .with_row_count(1)
            .with_grid_unit(10)
            .with_padding(5.0)
            .with_vertical(ItemDimensions::new(10.0, 40.0))
            .with_horizontal(ItemDimensions::new(30.0, 10.0))
            .build()
            .expect("valid geometry")
    }

    fn requests_strategy() -> impl Strategy<Value = Vec<PlacementRequest>> {
        prop::collection::vec((0.0f32..200.0, any::<bool>(), 0u32..3), 1..40).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (x, horizontal, z))| {
                    let orientation = if horizontal {
                        Orientation::Horizontal
                    } else {
                        Orientation::Vertical
                    };
                    PlacementRequest::new(format!("item-{i}"), 0, x)
                        .with_orientation(orientation)
                        .with_z_index(z)
                        .snapped(&geometry())
                })
                .collect()
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Admitting items one at a time only when valid never produces a collision:
    /// overlapping spans only occur across depths with a flat book involved.
    fn check_accepted_items_never_collide(
        requests: Vec<PlacementRequest>,
    ) -> Result<(), TestCaseError> {
        let geometry = geometry();
        let mut placed: Vec<ShelfItem> = Vec::new();

        for request in requests {
            if validate_placement(&placed, &geometry, &request).is_ok() {
                placed.push(
                    ShelfItem::new(request.item_id().clone(), 0, request.position_x())
                        .with_orientation(request.orientation())
                        .with_z_index(request.z_index()),
                );
            }
        }

        for (i, a) in placed.iter().enumerate() {
            for b in &placed[i + 1..] {
                let spans_overlap = geometry.item_span(a).overlaps(&geometry.item_span(b));
                let any_flat = a.orientation() == Orientation::Horizontal
                    || b.orientation() == Orientation::Horizontal;
                if spans_overlap {
                    prop_assert!(
                        any_flat && a.z_index() != b.z_index(),
                        "{} and {} collide",
                        a.id(),
                        b.id()
                    );
                }
            }
        }
        Ok(())
    }

    /// Accepted horizontal items above the front layer sit on something lower.
    fn check_elevated_items_are_supported(
        requests: Vec<PlacementRequest>,
    ) -> Result<(), TestCaseError> {
        let geometry = geometry();
        let mut placed: Vec<ShelfItem> = Vec::new();

        for request in requests {
            let accepted = validate_placement(&placed, &geometry, &request).is_ok();
            if accepted && request.orientation() == Orientation::Horizontal && request.z_index() > 0
            {
                let span = Span::new(request.position_x(), 30.0);
                prop_assert!(
                    placed
                        .iter()
                        .any(|item| item.z_index() < request.z_index()
                            && geometry.item_span(item).overlaps(&span))
                );
            }
            if accepted {
                placed.push(
                    ShelfItem::new(request.item_id().clone(), 0, request.position_x())
                        .with_orientation(request.orientation())
                        .with_z_index(request.z_index()),
                );
            }
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn accepted_items_never_collide(requests in requests_strategy()) {
            check_accepted_items_never_collide(requests)?;
        }

        #[test]
        fn elevated_items_are_supported(requests in requests_strategy()) {
            check_elevated_items_are_supported(requests)?;
        }
    }
}
