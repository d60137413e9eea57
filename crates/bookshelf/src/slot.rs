//! Slot finding for new items.
//!
//! New items always land on the front layer, so the search only looks at
//! horizontal spans: every item on a row blocks its span regardless of depth.

use log::{debug, trace};

use bookshelf_core::{
    geometry::Span,
    item::{Orientation, ShelfItem},
    shelf::ShelfGeometry,
};

/// A free position on the shelf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    row_index: u32,
    position_x: f32,
}

impl Slot {
    pub fn new(row_index: u32, position_x: f32) -> Self {
        Self {
            row_index,
            position_x,
        }
    }

    pub fn row_index(self) -> u32 {
        self.row_index
    }

    pub fn position_x(self) -> f32 {
        self.position_x
    }
}

/// Finds the first free position for an item of `item_width`.
///
/// Rows are visited once each, starting at `preferred_row` and wrapping
/// around. Within a row, positions are tried left to right from the padding
/// in grid-unit steps, up to `row_width - item_width - padding` inclusive.
///
/// Returns `None` when no row can take the item.
///
/// # Examples
///
/// ```
/// # use bookshelf::slot::find_next_available_slot;
/// # use bookshelf_core::{item::ShelfItem, shelf::{ItemDimensions, ShelfGeometry}};
/// let geometry = ShelfGeometry::builder()
///     .with_row_width(100.0)
///     .with_row_count(1)
///     .with_grid_unit(10)
///     .with_padding(5.0)
///     .with_vertical(ItemDimensions::new(10.0, 30.0))
///     .build()
///     .unwrap();
/// let items = vec![ShelfItem::new("a", 0, 5.0)];
///
/// let slot = find_next_available_slot(&items, &geometry, 10.0, 0).unwrap();
/// assert_eq!(slot.row_index(), 0);
/// assert_eq!(slot.position_x(), 15.0);
/// ```
pub fn find_next_available_slot(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    item_width: f32,
    preferred_row: u32,
) -> Option<Slot> {
    let row_count = geometry.row_count();
    if row_count == 0 {
        debug!("Shelf has no rows");
        return None;
    }

    let grid = geometry.grid();
    let min_x = geometry.min_position();
    let max_x = geometry.max_position(item_width);
    if max_x < min_x {
        debug!(item_width, row_width = geometry.row_width(); "Item is wider than a row");
        return None;
    }
    // Candidates are computed from an index so steps never accumulate error
    let steps = ((max_x - min_x) / grid + 1e-4).floor() as u32;

    let start_row = preferred_row % row_count;
    for offset in 0..row_count {
        let row = (start_row + offset) % row_count;
        let occupied: Vec<Span> = items
            .iter()
            .filter(|item| item.row_index() == row)
            .map(|item| geometry.item_span(item))
            .collect();

        for step in 0..=steps {
            let position_x = min_x + step as f32 * grid;
            let candidate = Span::new(position_x, item_width);
            if occupied.iter().all(|span| !span.overlaps(&candidate)) {
                debug!(row, position_x; "Found free slot");
                return Some(Slot::new(row, position_x));
            }
        }
        trace!(row, occupied = occupied.len(); "Row has no free slot");
    }

    debug!(item_width, preferred_row; "Shelf is full");
    None
}

/// Finds a free position for an item of the given orientation.
pub fn find_slot_for(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
    orientation: Orientation,
    preferred_row: u32,
) -> Option<Slot> {
    find_next_available_slot(
        items,
        geometry,
        geometry.item_width(orientation),
        preferred_row,
    )
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use bookshelf_core::{geometry::align_up, shelf::ItemDimensions};

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn geometry_strategy() -> impl Strategy<Value = ShelfGeometry> {
        (50.0f32..400.0, 1u32..4, 1i64..20, 0.0f32..15.0).prop_map(
            |(row_width, row_count, grid_unit, padding)| {
                ShelfGeometry::builder()
                    .with_row_width(row_width)
                    .with_row_count(row_count)
                    .with_grid_unit(grid_unit)
                    .with_padding(padding)
                    .with_vertical(ItemDimensions::new(10.0, 40.0))
                    .with_horizontal(ItemDimensions::new(30.0, 10.0))
                    .build()
                    .expect("strategy produces valid geometry")
            },
        )
    }

    fn items_strategy() -> impl Strategy<Value = Vec<ShelfItem>> {
        prop::collection::vec((0u32..4, 0.0f32..400.0, any::<bool>(), 0u32..3), 0..30).prop_map(
            |specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (row, x, horizontal, z))| {
                        let orientation = if horizontal {
                            Orientation::Horizontal
                        } else {
                            Orientation::Vertical
                        };
                        ShelfItem::new(format!("item-{i}"), row, x)
                            .with_orientation(orientation)
                            .with_z_index(z)
                    })
                    .collect()
            },
        )
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Repeated searches over the same input return the same slot.
    fn check_search_is_deterministic(
        items: &[ShelfItem],
        geometry: &ShelfGeometry,
        preferred_row: u32,
    ) -> Result<(), TestCaseError> {
        let first = find_next_available_slot(items, geometry, 10.0, preferred_row);
        let second = find_next_available_slot(items, geometry, 10.0, preferred_row);
        prop_assert_eq!(first, second);
        Ok(())
    }

    /// Returned slots stay within the padded, aligned row and overlap nothing.
    fn check_slot_is_in_bounds_and_free(
        items: &[ShelfItem],
        geometry: &ShelfGeometry,
        preferred_row: u32,
    ) -> Result<(), TestCaseError> {
        let item_width = 10.0;
        let Some(slot) = find_next_available_slot(items, geometry, item_width, preferred_row)
        else {
            return Ok(());
        };

        let grid = geometry.grid();
        let aligned = align_up(geometry.nominal_row_width(), grid);
        prop_assert!(slot.row_index() < geometry.row_count());
        prop_assert!(slot.position_x() >= geometry.padding());
        prop_assert!(slot.position_x() <= aligned - item_width - geometry.padding() + 0.01);

        let candidate = Span::new(slot.position_x(), item_width);
        for item in items.iter().filter(|i| i.row_index() == slot.row_index()) {
            prop_assert!(!geometry.item_span(item).overlaps(&candidate));
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn search_is_deterministic(
            items in items_strategy(),
            geometry in geometry_strategy(),
            preferred_row in 0u32..6,
        ) {
            check_search_is_deterministic(&items, &geometry, preferred_row)?;
        }

        #[test]
        fn slot_is_in_bounds_and_free(
            items in items_strategy(),
            geometry in geometry_strategy(),
            preferred_row in 0u32..6,
        ) {
            check_slot_is_in_bounds_and_free(&items, &geometry, preferred_row)?;
        }
    }
}
