//! Shelf state ownership.
//!
//! [`ShelfState`] owns the current item list of one shelf together with its
//! geometry and the transient selection. Every edit goes through the
//! placement validator first, so a rejected edit never touches the list.
//! Persistence is behind the [`ShelfStore`] trait; the state only crosses
//! that boundary in [`ShelfState::load`] and [`ShelfState::save`].

use log::{debug, info, warn};

use bookshelf_core::{
    identifier::{ItemId, SeriesId},
    item::{ItemError, Orientation, RawShelfItem, ShelfItem},
    shelf::ShelfGeometry,
};

use crate::{
    cache::GroupCache,
    error::ShelfError,
    grouping::SeriesGroup,
    placement::{PlacementError, PlacementRequest, plan_move, plan_orientation_change},
    slot::find_slot_for,
};

/// Persistence boundary for shelf items.
///
/// `load` hands out unvalidated records; they are checked when they enter
/// a [`ShelfState`].
pub trait ShelfStore {
    fn load(&self) -> Result<Vec<RawShelfItem>, ShelfError>;

    fn save(&mut self, items: &[ShelfItem]) -> Result<(), ShelfError>;
}

/// In-process store keeping records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<RawShelfItem>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<RawShelfItem>) -> Self {
        Self {
            records,
            saves: 0,
        }
    }

    pub fn records(&self) -> &[RawShelfItem] {
        &self.records
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl ShelfStore for MemoryStore {
    fn load(&self) -> Result<Vec<RawShelfItem>, ShelfError> {
        Ok(self.records.clone())
    }

    fn save(&mut self, items: &[ShelfItem]) -> Result<(), ShelfError> {
        self.records = items.iter().map(RawShelfItem::from).collect();
        self.saves += 1;
        Ok(())
    }
}

/// The items of one shelf and everything derived from them.
#[derive(Debug)]
pub struct ShelfState {
    geometry: ShelfGeometry,
    items: Vec<ShelfItem>,
    selected: Option<ItemId>,
    cache: GroupCache,
}

impl ShelfState {
    /// Creates an empty shelf.
    pub fn new(geometry: ShelfGeometry) -> Self {
        Self {
            geometry,
            items: Vec::new(),
            selected: None,
            cache: GroupCache::new(),
        }
    }

    /// Creates a shelf from already validated items.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::DuplicateId`] if two items share an id.
    pub fn with_items(geometry: ShelfGeometry, items: Vec<ShelfItem>) -> Result<Self, ShelfError> {
        let mut state = Self::new(geometry);
        for item in &items {
            if state.find(item.id()).is_some() {
                return Err(ItemError::DuplicateId(item.id().clone()).into());
            }
            state.items.push(item.clone());
        }
        Ok(state)
    }

    pub fn geometry(&self) -> &ShelfGeometry {
        &self.geometry
    }

    pub fn items(&self) -> &[ShelfItem] {
        &self.items
    }

    pub fn find(&self, item_id: &ItemId) -> Option<&ShelfItem> {
        self.items.iter().find(|item| item.id() == item_id)
    }

    /// Replaces the item list with the records from `store`.
    ///
    /// The records are validated as a whole; on error the current list and
    /// selection are kept.
    pub fn load(&mut self, store: &impl ShelfStore) -> Result<(), ShelfError> {
        let items = ShelfItem::from_records(store.load()?)?;
        info!(items = items.len(); "Shelf loaded");

        self.items = items;
        if self
            .selected
            .as_ref()
            .is_some_and(|id| self.find(id).is_none())
        {
            self.selected = None;
        }
        Ok(())
    }

    /// Writes the item list to `store`. The selection is not persisted.
    pub fn save(&self, store: &mut impl ShelfStore) -> Result<(), ShelfError> {
        store.save(&self.items)?;
        debug!(items = self.items.len(); "Shelf saved");
        Ok(())
    }

    /// Applies `edit` and persists the result, reverting the item list and
    /// the selection if either the edit or the save fails.
    pub fn commit<T>(
        &mut self,
        store: &mut impl ShelfStore,
        edit: impl FnOnce(&mut Self) -> Result<T, ShelfError>,
    ) -> Result<T, ShelfError> {
        let snapshot = self.items.clone();
        let selected = self.selected.clone();
        let result = edit(self).and_then(|value| {
            self.save(store)?;
            Ok(value)
        });
        if let Err(err) = &result {
            warn!(err:% = err; "Shelf edit reverted");
            self.items = snapshot;
            self.selected = selected;
        }
        result
    }

    /// Marks an item as selected.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::UnknownItem`] if the item is not on the shelf.
    pub fn select(&mut self, item_id: &ItemId) -> Result<(), ShelfError> {
        if self.find(item_id).is_none() {
            return Err(PlacementError::UnknownItem(item_id.clone()).into());
        }
        self.selected = Some(item_id.clone());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&ShelfItem> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    /// Adds a new item at the first free slot, searching from `preferred_row`.
    ///
    /// New items always start on the front layer.
    ///
    /// # Errors
    ///
    /// - [`ItemError::EmptyId`] or [`ItemError::DuplicateId`] for a bad id.
    /// - [`PlacementError::NoSpace`] when no row has room for the item.
    pub fn place_new(
        &mut self,
        item_id: impl Into<ItemId>,
        orientation: Orientation,
        series_id: Option<SeriesId>,
        preferred_row: u32,
    ) -> Result<&ShelfItem, ShelfError> {
        let item_id = item_id.into();
        if item_id.as_str().trim().is_empty() {
            return Err(ItemError::EmptyId.into());
        }
        if self.find(&item_id).is_some() {
            return Err(ItemError::DuplicateId(item_id).into());
        }

        let slot = find_slot_for(&self.items, &self.geometry, orientation, preferred_row)
            .ok_or(PlacementError::NoSpace)?;
        let item = ShelfItem::new(item_id, slot.row_index(), slot.position_x())
            .with_orientation(orientation)
            .with_series_id(series_id);
        debug!(
            item_id:% = item.id(),
            row = slot.row_index(),
            position_x = slot.position_x();
            "Item placed"
        );

        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Moves an item, snapping the requested position to the grid.
    pub fn move_item(&mut self, request: PlacementRequest) -> Result<&ShelfItem, ShelfError> {
        let moved = plan_move(&self.items, &self.geometry, request)?;
        Ok(self.replace(moved))
    }

    /// Turns an item in place.
    pub fn change_orientation(
        &mut self,
        item_id: &ItemId,
        orientation: Orientation,
    ) -> Result<&ShelfItem, ShelfError> {
        let turned = plan_orientation_change(&self.items, &self.geometry, item_id, orientation)?;
        Ok(self.replace(turned))
    }

    /// Swaps an item between vertical and horizontal.
    pub fn toggle_orientation(&mut self, item_id: &ItemId) -> Result<&ShelfItem, ShelfError> {
        let orientation = self
            .find(item_id)
            .map(|item| item.orientation().toggled())
            .ok_or_else(|| PlacementError::UnknownItem(item_id.clone()))?;
        self.change_orientation(item_id, orientation)
    }

    /// Removes an item, clearing the selection if it pointed at it.
    pub fn remove(&mut self, item_id: &ItemId) -> Result<ShelfItem, ShelfError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or_else(|| PlacementError::UnknownItem(item_id.clone()))?;
        if self.selected.as_ref() == Some(item_id) {
            self.selected = None;
        }
        Ok(self.items.remove(index))
    }

    /// Returns the current series groups.
    pub fn groups(&mut self) -> Vec<SeriesGroup> {
        self.cache.groups(&self.items, &self.geometry)
    }

    fn replace(&mut self, updated: ShelfItem) -> &ShelfItem {
        match self.items.iter().position(|item| item.id() == updated.id()) {
            Some(index) => {
                self.items[index] = updated;
                &self.items[index]
            }
            None => {
                self.items.push(updated);
                &self.items[self.items.len() - 1]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use bookshelf_core::shelf::ItemDimensions;

    use super::*;

    fn shelf() -> ShelfGeometry {
        ShelfGeometry::builder()
            .with_row_width(100.0)
            .with_row_count(2)
            .with_grid_unit(10)
            .with_padding(5.0)
            .with_vertical(ItemDimensions::new(10.0, 30.0))
            .with_horizontal(ItemDimensions::new(30.0, 10.0))
            .build()
            .unwrap()
    }

    fn record(id: &str, row: i64, x: f64) -> RawShelfItem {
        RawShelfItem {
            id: id.to_string(),
            row_index: row,
            position_x: x,
            series_id: Some("s".to_string()),
            ..Default::default()
        }
    }

    /// Store whose saves always fail.
    struct BrokenStore;

    impl ShelfStore for BrokenStore {
        fn load(&self) -> Result<Vec<RawShelfItem>, ShelfError> {
            Ok(Vec::new())
        }

        fn save(&mut self, _items: &[ShelfItem]) -> Result<(), ShelfError> {
            Err(ShelfError::Store("backend unavailable".to_string()))
        }
    }

    #[test]
    fn test_load_validates_records() {
        let store = MemoryStore::with_records(vec![record("a", 0, 5.0), record("b", -1, 15.0)]);
        let mut state = ShelfState::new(shelf());

        let err = state.load(&store).unwrap_err();
        assert!(matches!(err, ShelfError::Item(ItemError::NegativeRow { .. })));
        assert!(state.items().is_empty());
    }

    #[test]
    fn test_load_then_save_round_trips() {
        let mut store = MemoryStore::with_records(vec![record("a", 0, 5.0), record("b", 0, 15.0)]);
        let mut state = ShelfState::new(shelf());
        state.load(&store).unwrap();
        state.select(&ItemId::from("a")).unwrap();
        state.save(&mut store).unwrap();

        assert_eq!(store.saves(), 1);
        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[1].series_id.as_deref(), Some("s"));
    }

    #[test]
    fn test_place_new_uses_first_free_slot() {
        let mut state = ShelfState::new(shelf());
        state.place_new("a", Orientation::Vertical, None, 0).unwrap();
        let placed = state.place_new("b", Orientation::Vertical, None, 0).unwrap();

        assert_eq!(placed.row_index(), 0);
        assert_approx_eq!(f32, placed.position_x(), 15.0);
        assert_eq!(placed.z_index(), 0);
    }

    #[test]
    fn test_place_new_rejects_duplicates_and_full_shelf() {
        let geometry = ShelfGeometry::builder()
            .with_row_width(20.0)
            .with_row_count(1)
            .with_grid_unit(10)
            .with_padding(5.0)
            .with_vertical(ItemDimensions::new(10.0, 30.0))
            .build()
            .unwrap();
        let mut state = ShelfState::new(geometry);
        state.place_new("a", Orientation::Vertical, None, 0).unwrap();

        assert!(matches!(
            state.place_new("a", Orientation::Vertical, None, 0),
            Err(ShelfError::Item(ItemError::DuplicateId(_)))
        ));
        assert!(matches!(
            state.place_new("b", Orientation::Vertical, None, 0),
            Err(ShelfError::Placement(PlacementError::NoSpace))
        ));
        assert!(matches!(
            state.place_new(" ", Orientation::Vertical, None, 0),
            Err(ShelfError::Item(ItemError::EmptyId))
        ));
        assert_eq!(state.items().len(), 1);
    }

    #[test]
    fn test_rejected_move_leaves_items_untouched() {
        let items = vec![ShelfItem::new("a", 0, 5.0), ShelfItem::new("b", 0, 15.0)];
        let mut state = ShelfState::with_items(shelf(), items.clone()).unwrap();

        let err = state
            .move_item(PlacementRequest::new("b", 0, 7.0))
            .unwrap_err();
        assert!(matches!(err, ShelfError::Placement(PlacementError::NoSpace)));
        assert_eq!(state.items(), items.as_slice());
    }

    #[test]
    fn test_move_snaps_and_updates() {
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();

        let moved = state.move_item(PlacementRequest::new("a", 1, 42.0)).unwrap();
        assert_eq!(moved.row_index(), 1);
        assert_approx_eq!(f32, moved.position_x(), 40.0);
    }

    #[test]
    fn test_toggle_orientation() {
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();
        let id = ItemId::from("a");

        assert_eq!(
            state.toggle_orientation(&id).unwrap().orientation(),
            Orientation::Horizontal
        );
        assert_eq!(
            state.toggle_orientation(&id).unwrap().orientation(),
            Orientation::Vertical
        );
    }

    #[test]
    fn test_toggle_blocked_by_neighbour() {
        let items = vec![ShelfItem::new("a", 0, 5.0), ShelfItem::new("b", 0, 25.0)];
        let mut state = ShelfState::with_items(shelf(), items).unwrap();

        let err = state.toggle_orientation(&ItemId::from("a")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No space available for this orientation/position"
        );
        assert_eq!(state.items()[0].orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();
        let id = ItemId::from("a");
        state.select(&id).unwrap();
        assert!(state.selected().is_some());

        state.remove(&id).unwrap();
        assert!(state.selected().is_none());
        assert!(matches!(
            state.remove(&id),
            Err(ShelfError::Placement(PlacementError::UnknownItem(_)))
        ));
    }

    #[test]
    fn test_clear_selection() {
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();
        state.select(&ItemId::from("a")).unwrap();
        assert!(state.selected().is_some());

        state.clear_selection();
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_select_unknown_item() {
        let mut state = ShelfState::new(shelf());
        assert!(state.select(&ItemId::from("ghost")).is_err());
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_groups_follow_edits() {
        let items = vec![
            ShelfItem::new("a", 0, 5.0).with_series("s"),
            ShelfItem::new("b", 0, 15.0).with_series("s"),
        ];
        let mut state = ShelfState::with_items(shelf(), items).unwrap();
        assert_eq!(state.groups().len(), 1);

        state.move_item(PlacementRequest::new("b", 0, 55.0)).unwrap();
        assert!(state.groups().is_empty());
    }

    #[test]
    fn test_commit_saves_on_success() {
        let mut store = MemoryStore::new();
        let mut state = ShelfState::new(shelf());

        state
            .commit(&mut store, |state| {
                state.place_new("a", Orientation::Vertical, None, 0)?;
                Ok(())
            })
            .unwrap();

        assert_eq!(store.records().len(), 1);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_commit_restores_selection_on_failed_save() {
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();
        state.select(&ItemId::from("a")).unwrap();

        let result = state.commit(&mut BrokenStore, |state| {
            state.remove(&ItemId::from("a"))?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.selected().map(|item| item.id().as_str()), Some("a"));
    }

    #[test]
    fn test_commit_skips_save_on_rejected_edit() {
        let mut store = MemoryStore::new();
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();

        let result = state.commit(&mut store, |state| {
            state.remove(&ItemId::from("ghost"))?;
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(store.saves(), 0);
        assert_eq!(state.items().len(), 1);
    }

    #[test]
    fn test_commit_reverts_on_failed_save() {
        let mut state =
            ShelfState::with_items(shelf(), vec![ShelfItem::new("a", 0, 5.0)]).unwrap();

        let result = state.commit(&mut BrokenStore, |state| {
            state.move_item(PlacementRequest::new("a", 0, 45.0))?;
            Ok(())
        });

        assert!(matches!(result, Err(ShelfError::Store(_))));
        assert_approx_eq!(f32, state.items()[0].position_x(), 5.0);
    }
}
