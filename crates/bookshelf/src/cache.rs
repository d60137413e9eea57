//! Memoized series grouping.
//!
//! Groups depend only on the items of one row, so [`GroupCache`] keeps the
//! groups of every row under a structural fingerprint of that row. Item lists
//! are usually rebuilt from scratch on every edit, so the key is derived from
//! item contents, never from where the list lives.

use std::{
    collections::{BTreeMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
};

use log::{debug, trace};

use bookshelf_core::{
    item::{Orientation, ShelfItem},
    shelf::ShelfGeometry,
};

use crate::grouping::{SeriesGroup, detect_adjacent_series_groups};

/// A fingerprint match is confirmed against the stored inputs, so a hash
/// collision costs a recompute instead of returning stale groups.
#[derive(Debug)]
struct CachedRow {
    fingerprint: u64,
    geometry: ShelfGeometry,
    items: Vec<ShelfItem>,
    groups: Vec<SeriesGroup>,
}

impl CachedRow {
    fn matches(&self, fingerprint: u64, geometry: &ShelfGeometry, items: &[ShelfItem]) -> bool {
        self.fingerprint == fingerprint && self.geometry == *geometry && self.items == items
    }
}

/// Per-row cache in front of [`detect_adjacent_series_groups`].
///
/// The returned groups are identical to a fresh detection restricted to each
/// row, with rows in ascending order.
#[derive(Debug, Default)]
pub struct GroupCache {
    rows: BTreeMap<u32, CachedRow>,
    hits: u64,
    misses: u64,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the groups of `items`, recomputing only rows that changed.
    pub fn groups(&mut self, items: &[ShelfItem], geometry: &ShelfGeometry) -> Vec<SeriesGroup> {
        let mut by_row: BTreeMap<u32, Vec<ShelfItem>> = BTreeMap::new();
        for item in items {
            by_row.entry(item.row_index()).or_default().push(item.clone());
        }

        // Rows that disappeared would otherwise linger forever
        self.rows.retain(|row, _| by_row.contains_key(row));

        let geometry_print = geometry_fingerprint(geometry);
        let mut groups = Vec::new();
        for (row, row_items) in by_row {
            let fingerprint = row_fingerprint(geometry_print, &row_items);
            match self.rows.get(&row) {
                Some(cached) if cached.matches(fingerprint, geometry, &row_items) => {
                    self.hits += 1;
                    trace!(row; "Group cache hit");
                    groups.extend(cached.groups.iter().cloned());
                }
                _ => {
                    self.misses += 1;
                    trace!(row; "Group cache miss");
                    let row_groups = detect_adjacent_series_groups(&row_items, geometry);
                    groups.extend(row_groups.iter().cloned());
                    self.rows.insert(
                        row,
                        CachedRow {
                            fingerprint,
                            geometry: geometry.clone(),
                            items: row_items,
                            groups: row_groups,
                        },
                    );
                }
            }
        }

        debug!(
            groups = groups.len(),
            hits = self.hits,
            misses = self.misses;
            "Groups resolved through cache"
        );
        groups
    }

    /// Drops every cached row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Number of rows answered from the cache so far
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of rows recomputed so far
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

fn geometry_fingerprint(geometry: &ShelfGeometry) -> u64 {
    let mut hasher = DefaultHasher::new();
    geometry.row_width().to_bits().hash(&mut hasher);
    geometry.row_count().hash(&mut hasher);
    geometry.grid_unit().hash(&mut hasher);
    geometry.padding().to_bits().hash(&mut hasher);
    for orientation in [Orientation::Vertical, Orientation::Horizontal] {
        let dimensions = geometry.dimensions(orientation);
        dimensions.width().to_bits().hash(&mut hasher);
        dimensions.height().to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn row_fingerprint(geometry_print: u64, items: &[ShelfItem]) -> u64 {
    let mut hasher = DefaultHasher::new();
    geometry_print.hash(&mut hasher);
    items.len().hash(&mut hasher);
    for item in items {
        item.id().hash(&mut hasher);
        item.position_x().to_bits().hash(&mut hasher);
        item.orientation().hash(&mut hasher);
        item.z_index().hash(&mut hasher);
        item.series_id().hash(&mut hasher);
    }
    hasher.finish()
}
