//! Configuration types for shelves and their previews.
//!
//! All types implement [`serde::Deserialize`] and default every missing
//! field, so an empty document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining shelf and style settings.
//! - [`ShelfConfig`] - Shelf dimensions, turned into a [`ShelfGeometry`].
//! - [`StyleConfig`] - Colors used by the SVG preview.
//!
//! # Example
//!
//! ```
//! # use bookshelf::config::AppConfig;
//! let config = AppConfig::default();
//! let geometry = config.shelf().geometry().unwrap();
//! assert_eq!(geometry.row_count(), 3);
//! assert!(config.style().board_color().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use bookshelf_core::{
    color::Color,
    item::Orientation,
    shelf::{GeometryError, ItemDimensions, ShelfGeometry},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Shelf geometry section.
    #[serde(default)]
    shelf: ShelfConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified shelf and style configurations.
    pub fn new(shelf: ShelfConfig, style: StyleConfig) -> Self {
        Self { shelf, style }
    }

    /// Returns the shelf configuration.
    pub fn shelf(&self) -> &ShelfConfig {
        &self.shelf
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns a copy with the shelf section replaced.
    pub fn with_shelf(mut self, shelf: ShelfConfig) -> Self {
        self.shelf = shelf;
        self
    }
}

/// Shelf dimensions as written in configuration files.
///
/// Values are kept as configured; validation happens in [`ShelfConfig::geometry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    row_width: f32,
    row_count: u32,
    grid_unit: i64,
    padding: f32,
    vertical: ItemDimensions,
    horizontal: ItemDimensions,
}

impl Default for ShelfConfig {
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

impl ShelfConfig {
    pub fn with_row_width(mut self, row_width: f32) -> Self {
        self.row_width = row_width;
        self
    }

    pub fn with_row_count(mut self, row_count: u32) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_grid_unit(mut self, grid_unit: i64) -> Self {
        self.grid_unit = grid_unit;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_vertical(mut self, dimensions: ItemDimensions) -> Self {
        self.vertical = dimensions;
        self
    }

    pub fn with_horizontal(mut self, dimensions: ItemDimensions) -> Self {
        self.horizontal = dimensions;
        self
    }

    /// Builds the validated [`ShelfGeometry`].
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] when any dimension is out of range,
    /// including a grid unit of zero or less.
    pub fn geometry(&self) -> Result<ShelfGeometry, GeometryError> {
        ShelfGeometry::builder()
            .with_row_width(self.row_width)
            .with_row_count(self.row_count)
            .with_grid_unit(self.grid_unit)
            .with_padding(self.padding)
            .with_vertical(self.vertical)
            .with_horizontal(self.horizontal)
            .build()
    }
}

impl From<&ShelfGeometry> for ShelfConfig {
    fn from(geometry: &ShelfGeometry) -> Self {
        Self {
            row_width: geometry.nominal_row_width(),
            row_count: geometry.row_count(),
            grid_unit: i64::from(geometry.grid_unit().get()),
            padding: geometry.padding(),
            vertical: geometry.dimensions(Orientation::Vertical),
            horizontal: geometry.dimensions(Orientation::Horizontal),
        }
    }
}

/// Visual styling of shelf previews.
///
/// Colors are CSS strings. Items of a series take a color from
/// `series_palette`, picked by series so every volume of a series matches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    board_color: String,
    item_color: String,
    group_color: String,
    label_color: String,
    series_palette: Vec<String>,
    show_labels: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            board_color: "#8b5a2b".to_string(),
            item_color: "#d9d4c7".to_string(),
            group_color: "#e4572e".to_string(),
            label_color: "#333333".to_string(),
            series_palette: [
                "#4e79a7", "#f28e2b", "#59a14f", "#b07aa1", "#76b7b2", "#edc948",
            ]
            .iter()
            .map(|color| color.to_string())
            .collect(),
            show_labels: true,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn board_color(&self) -> Result<Color, String> {
        parse_color("board", &self.board_color)
    }

    /// Color of items that belong to no series
    pub fn item_color(&self) -> Result<Color, String> {
        parse_color("item", &self.item_color)
    }

    pub fn group_color(&self) -> Result<Color, String> {
        parse_color("group", &self.group_color)
    }

    pub fn label_color(&self) -> Result<Color, String> {
        parse_color("label", &self.label_color)
    }

    /// Returns the parsed series palette. An empty palette is allowed.
    pub fn series_palette(&self) -> Result<Vec<Color>, String> {
        self.series_palette
            .iter()
            .map(|color| parse_color("series palette", color))
            .collect()
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_show_labels(mut self, show_labels: bool) -> Self {
        self.show_labels = show_labels;
        self
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} color in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shelf_geometry() {
        let geometry = ShelfConfig::default().geometry().unwrap();

        assert_eq!(geometry.row_width(), 600.0);
        assert_eq!(geometry.row_count(), 3);
        assert_eq!(geometry.grid(), 10.0);
        assert_eq!(geometry.padding(), 10.0);
    }

    #[test]
    fn test_zero_grid_unit_is_rejected() {
        let config = ShelfConfig::default().with_grid_unit(0);
        assert_eq!(config.geometry(), Err(GeometryError::InvalidGridUnit(0)));
    }

    #[test]
    fn test_geometry_round_trips_through_config() {
        let geometry = ShelfConfig::default()
            .with_row_width(455.0)
            .with_grid_unit(5)
            .geometry()
            .unwrap();

        let config = ShelfConfig::from(&geometry);
        assert_eq!(config.geometry().unwrap(), geometry);
    }

    #[test]
    fn test_default_style_colors_parse() {
        let style = StyleConfig::default();

        assert_eq!(style.background_color(), Ok(None));
        assert!(style.board_color().is_ok());
        assert!(style.item_color().is_ok());
        assert!(style.group_color().is_ok());
        assert!(style.label_color().is_ok());
        assert_eq!(style.series_palette().unwrap().len(), 6);
    }

    #[test]
    fn test_invalid_color_names_field() {
        let style = StyleConfig::default().with_background_color("nope");
        let err = style.background_color().unwrap_err();
        assert!(err.contains("background"));
    }
}
