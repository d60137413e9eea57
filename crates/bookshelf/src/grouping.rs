//! Grouping of adjacent same-series items.
//!
//! Items are bucketed by row, series and orientation. Inside a bucket, two
//! items are connected when their projected rectangles touch or sit within
//! the shelf's adjacency threshold of each other (see
//! [`Rect::is_adjacent`](bookshelf_core::geometry::Rect::is_adjacent)). Every
//! connected component with at least two members becomes a [`SeriesGroup`].
//!
//! Grouping is a pure view over the item list and never fails: items without
//! a series are ignored and unknown orientations get the fallback footprint.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, trace};

use bookshelf_core::{
    geometry::{Rect, Span},
    identifier::SeriesId,
    item::{Orientation, ShelfItem},
    shelf::ShelfGeometry,
};

/// A cluster of adjacent items of one series on one row.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    series_id: SeriesId,
    row_index: u32,
    orientation: Orientation,
    start_x: f32,
    end_x: f32,
    min_z: u32,
    max_z: u32,
    items: Vec<ShelfItem>,
}

impl SeriesGroup {
    pub fn series_id(&self) -> &SeriesId {
        &self.series_id
    }

    pub fn row_index(&self) -> u32 {
        self.row_index
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the left edge of the leftmost member
    pub fn start_x(&self) -> f32 {
        self.start_x
    }

    /// Returns the right edge of the rightmost member
    pub fn end_x(&self) -> f32 {
        self.end_x
    }

    pub fn min_z(&self) -> u32 {
        self.min_z
    }

    pub fn max_z(&self) -> u32 {
        self.max_z
    }

    /// Returns the horizontal extent covered by the group
    pub fn span(&self) -> Span {
        Span::from_bounds(self.start_x, self.end_x)
    }

    /// Returns the members ordered by position, then depth
    pub fn items(&self) -> &[ShelfItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn from_members(geometry: &ShelfGeometry, mut members: Vec<ShelfItem>) -> Option<Self> {
        let first = members.first()?;
        let series_id = first.series_id()?.clone();
        let row_index = first.row_index();
        let orientation = first.orientation();

        let span = members
            .iter()
            .map(|item| geometry.item_span(item))
            .reduce(|acc, span| acc.merge(&span))?;
        let min_z = members.iter().map(ShelfItem::z_index).min()?;
        let max_z = members.iter().map(ShelfItem::z_index).max()?;

        members.sort_by(|a, b| {
            a.position_x()
                .total_cmp(&b.position_x())
                .then(a.z_index().cmp(&b.z_index()))
        });

        Some(Self {
            series_id,
            row_index,
            orientation,
            start_x: span.start(),
            end_x: span.end(),
            min_z,
            max_z,
            items: members,
        })
    }
}

type BucketKey<'a> = (u32, &'a SeriesId, Orientation);

/// Finds all groups of two or more adjacent same-series items.
///
/// The result is deterministic for a given input order: buckets are visited
/// in order of first appearance and each bucket is searched from its first
/// unvisited item.
///
/// # Examples
///
/// ```
/// # use bookshelf::grouping::detect_adjacent_series_groups;
/// # use bookshelf_core::{item::ShelfItem, shelf::{ItemDimensions, ShelfGeometry}};
/// let geometry = ShelfGeometry::builder()
///     .with_grid_unit(10)
///     .with_vertical(ItemDimensions::new(10.0, 30.0))
///     .build()
///     .unwrap();
/// let items = vec![
///     ShelfItem::new("v1", 0, 5.0).with_series("berserk"),
///     ShelfItem::new("v2", 0, 15.0).with_series("berserk"),
///     ShelfItem::new("other", 0, 25.0),
/// ];
///
/// let groups = detect_adjacent_series_groups(&items, &geometry);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].start_x(), 5.0);
/// assert_eq!(groups[0].end_x(), 25.0);
/// ```
pub fn detect_adjacent_series_groups(
    items: &[ShelfItem],
    geometry: &ShelfGeometry,
) -> Vec<SeriesGroup> {
    let threshold = geometry.adjacency_threshold();
    let mut groups = Vec::new();

    for ((row, series_id, orientation), bucket) in bucket_items(items) {
        let rects: Vec<Rect> = bucket.iter().map(|item| geometry.item_rect(item)).collect();

        for component in connected_components(&bucket, &rects, threshold) {
            if component.len() < 2 {
                continue;
            }
            let members = component.iter().map(|&i| bucket[i].clone()).collect();
            if let Some(group) = SeriesGroup::from_members(geometry, members) {
                trace!(
                    row,
                    series_id = series_id.as_str(),
                    orientation:% = orientation,
                    size = group.len();
                    "Series group found"
                );
                groups.push(group);
            }
        }
    }

    debug!(items = items.len(), groups = groups.len(); "Series groups detected");
    groups
}

/// Buckets items with a series by row, series and orientation, in first-appearance order
fn bucket_items(items: &[ShelfItem]) -> IndexMap<BucketKey<'_>, Vec<&ShelfItem>> {
    let mut buckets: IndexMap<BucketKey<'_>, Vec<&ShelfItem>> = IndexMap::new();
    for item in items {
        let Some(series_id) = item.series_id() else {
            continue;
        };
        buckets
            .entry((item.row_index(), series_id, item.orientation()))
            .or_default()
            .push(item);
    }
    buckets
}

/// Depth-first search over the adjacency relation; returns indices into `bucket`.
fn connected_components(
    bucket: &[&ShelfItem],
    rects: &[Rect],
    threshold: f32,
) -> Vec<Vec<usize>> {
    let mut visited = HashSet::new();
    let mut components = Vec::new();

    for start in 0..bucket.len() {
        if !visited.insert(bucket[start].id()) {
            continue;
        }

        let mut component = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            component.push(current);
            for next in 0..bucket.len() {
                if visited.contains(bucket[next].id()) {
                    continue;
                }
                if rects[current].is_adjacent(&rects[next], threshold) {
                    visited.insert(bucket[next].id());
                    stack.push(next);
                }
            }
        }
        components.push(component);
    }

    components
}
