//! Shelf items and their boundary records.
//!
//! [`ShelfItem`] is the strict shape the layout engine works with. Records
//! coming from the data layer arrive as [`RawShelfItem`] and are validated
//! once, at the boundary, through [`TryFrom`] and [`ShelfItem::from_records`].

use std::{collections::HashSet, fmt};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identifier::{ItemId, SeriesId};

/// How a book sits on the shelf.
///
/// Records carrying any other value are coerced to [`Orientation::Unknown`]
/// rather than rejected; layout code gives unknown items vertical dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Spine out, narrow footprint
    #[default]
    Vertical,
    /// Lying flat, wide footprint
    Horizontal,
    /// Unrecognized value from the data layer
    #[serde(other)]
    Unknown,
}

impl Orientation {
    /// Parses an orientation, mapping unrecognized values to [`Orientation::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use bookshelf_core::item::Orientation;
    /// assert_eq!(Orientation::parse_lenient("Horizontal"), Orientation::Horizontal);
    /// assert_eq!(Orientation::parse_lenient(" vertical "), Orientation::Vertical);
    /// assert_eq!(Orientation::parse_lenient("diagonal"), Orientation::Unknown);
    /// ```
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "vertical" => Self::Vertical,
            "horizontal" => Self::Horizontal,
            _ => Self::Unknown,
        }
    }

    /// Returns the other orientation. Unknown items turn horizontal.
    pub fn toggled(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical | Self::Unknown => Self::Horizontal,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A book placed on a shelf row.
///
/// # Examples
///
/// ```
/// # use bookshelf_core::item::{Orientation, ShelfItem};
/// let item = ShelfItem::new("vol-1", 0, 5.0)
///     .with_orientation(Orientation::Horizontal)
///     .with_z_index(1)
///     .with_series("berserk");
///
/// assert_eq!(item.row_index(), 0);
/// assert_eq!(item.z_index(), 1);
/// assert_eq!(item.series_id().map(|s| s.as_str()), Some("berserk"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfItem {
    id: ItemId,
    row_index: u32,
    position_x: f32,
    #[serde(default)]
    orientation: Orientation,
    #[serde(default)]
    z_index: u32,
    #[serde(default)]
    series_id: Option<SeriesId>,
}

impl ShelfItem {
    /// Creates a vertical, front-layer item without a series
    pub fn new(id: impl Into<ItemId>, row_index: u32, position_x: f32) -> Self {
        Self {
            id: id.into(),
            row_index,
            position_x,
            orientation: Orientation::default(),
            z_index: 0,
            series_id: None,
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

    pub fn with_series(mut self, series_id: impl Into<SeriesId>) -> Self {
        self.series_id = Some(series_id.into());
        self
    }

    pub fn with_series_id(mut self, series_id: Option<SeriesId>) -> Self {
        self.series_id = series_id;
        self
    }

    /// Moves the item to another row and horizontal position
    pub fn with_placement(mut self, row_index: u32, position_x: f32) -> Self {
        self.row_index = row_index;
        self.position_x = position_x;
        self
    }

    pub fn id(&self) -> &ItemId {
        &self.id
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

    pub fn series_id(&self) -> Option<&SeriesId> {
        self.series_id.as_ref()
    }

    /// Validates a batch of records, rejecting duplicate identifiers.
    ///
    /// # Errors
    ///
    /// Returns the first [`ItemError`] encountered, in record order.
    pub fn from_records(
        records: impl IntoIterator<Item = RawShelfItem>,
    ) -> Result<Vec<ShelfItem>, ItemError> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .map(|record| {
                let item = ShelfItem::try_from(record)?;
                if !seen.insert(item.id.clone()) {
                    return Err(ItemError::DuplicateId(item.id));
                }
                Ok(item)
            })
            .collect()
    }
}

/// Errors raised while validating records from the data layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("item id must not be empty")]
    EmptyId,

    #[error("item `{id}` has negative row index {row}")]
    NegativeRow { id: String, row: i64 },

    #[error("item `{id}` has row index {row} out of range")]
    RowTooLarge { id: String, row: i64 },

    #[error("item `{id}` has invalid position {position}")]
    InvalidPosition { id: String, position: f64 },

    #[error("item `{id}` has invalid depth layer {z_index}")]
    InvalidDepth { id: String, z_index: i64 },

    #[error("duplicate item id `{0}`")]
    DuplicateId(ItemId),
}

/// An unvalidated item record as delivered by the data layer.
///
/// Accepts both snake_case and camelCase keys. Optional fields fall back to
/// a vertical, front-layer item without a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawShelfItem {
    pub id: String,

    #[serde(alias = "rowIndex")]
    pub row_index: i64,

    #[serde(alias = "positionX")]
    pub position_x: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,

    #[serde(default, alias = "zIndex", skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,

    #[serde(default, alias = "seriesId", skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
}

impl TryFrom<RawShelfItem> for ShelfItem {
    type Error = ItemError;

    fn try_from(raw: RawShelfItem) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(ItemError::EmptyId);
        }
        if raw.row_index < 0 {
            return Err(ItemError::NegativeRow {
                id: raw.id,
                row: raw.row_index,
            });
        }
        let row_index = u32::try_from(raw.row_index).map_err(|_| ItemError::RowTooLarge {
            id: raw.id.clone(),
            row: raw.row_index,
        })?;
        // Finite f64 values beyond f32 range turn into infinity here
        let position_x = raw.position_x as f32;
        if !position_x.is_finite() || position_x < 0.0 {
            return Err(ItemError::InvalidPosition {
                id: raw.id,
                position: raw.position_x,
            });
        }
        let z_index = raw.z_index.unwrap_or(0);
        let Ok(z_index) = u32::try_from(z_index) else {
            return Err(ItemError::InvalidDepth { id: raw.id, z_index });
        };

        let orientation = match raw.orientation.as_deref() {
            None => Orientation::default(),
            Some(value) => {
                let orientation = Orientation::parse_lenient(value);
                if orientation == Orientation::Unknown {
                    warn!(item_id = raw.id, orientation = value; "Unknown orientation, treating item defensively");
                }
                orientation
            }
        };

        let series_id = raw
            .series_id
            .filter(|series| !series.trim().is_empty())
            .map(SeriesId::from);

        Ok(Self {
            id: ItemId::from(raw.id),
            row_index,
            position_x,
            orientation,
            z_index,
            series_id,
        })
    }
}

impl From<&ShelfItem> for RawShelfItem {
    fn from(item: &ShelfItem) -> Self {
        Self {
            id: item.id.to_string(),
            row_index: i64::from(item.row_index),
            position_x: f64::from(item.position_x),
            orientation: Some(item.orientation.name().to_string()),
            z_index: Some(i64::from(item.z_index)),
            series_id: item.series_id.as_ref().map(ToString::to_string),
        }
    }
}
