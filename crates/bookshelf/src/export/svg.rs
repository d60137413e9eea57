//! SVG preview of a shelf.
//!
//! Rows are drawn top to bottom, each as a board with its items standing on
//! it. Depth is drawn upwards: a horizontal item on layer `z` sits `z` item
//! heights above the board. Series groups are outlined on top of the items.

use std::{fs, path::Path};

use indexmap::IndexMap;
use log::{debug, error, info};
use svg::node::element::{Rectangle, Text as TextElement, Title};

use bookshelf_core::{
    color::Color,
    draw::{LayeredOutput, ShelfLayer},
    geometry::Rect,
    identifier::SeriesId,
    item::{Orientation, ShelfItem},
    shelf::ShelfGeometry,
};

use super::Error;
use crate::{config::StyleConfig, grouping::SeriesGroup};

const MARGIN: f32 = 20.0;
const BOARD_THICKNESS: f32 = 8.0;
const ROW_GAP: f32 = 12.0;
const GROUP_INSET: f32 = 2.0;
const LABEL_FONT_SIZE: f32 = 10.0;

/// Resolved colors for one render.
#[derive(Debug, Clone)]
struct Palette {
    background: Option<Color>,
    board: Color,
    item: Color,
    group: Color,
    label: Color,
    series: Vec<Color>,
}

impl Palette {
    fn from_style(style: &StyleConfig) -> Result<Self, String> {
        Ok(Self {
            background: style.background_color()?,
            board: style.board_color()?,
            item: style.item_color()?,
            group: style.group_color()?,
            label: style.label_color()?,
            series: style.series_palette()?,
        })
    }
}

/// Renders shelves into SVG documents.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    style: StyleConfig,
}

impl SvgRenderer {
    pub fn new(style: &StyleConfig) -> Self {
        Self {
            style: style.clone(),
        }
    }

    /// Renders the shelf into an SVG document string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if a configured color cannot be parsed.
    pub fn render(
        &self,
        geometry: &ShelfGeometry,
        items: &[ShelfItem],
        groups: &[SeriesGroup],
    ) -> Result<String, Error> {
        let palette = Palette::from_style(&self.style).map_err(Error::Render)?;
        let frame = Frame::new(geometry);

        let mut output = LayeredOutput::new();
        if let Some(background) = &palette.background {
            output.add_to_layer(
                ShelfLayer::Board,
                Box::new(
                    Rectangle::new()
                        .set("width", frame.width)
                        .set("height", frame.height)
                        .set("fill", background.to_string())
                        .set("fill-opacity", background.alpha()),
                ),
            );
        }
        output.merge(self.render_boards(&frame, &palette));
        output.merge(self.render_items(&frame, &palette, items));
        output.merge(self.render_groups(&frame, &palette, groups));

        let document = output.render().into_iter().fold(
            svg::Document::new()
                .set("viewBox", format!("0 0 {} {}", frame.width, frame.height))
                .set("width", frame.width)
                .set("height", frame.height),
            |doc, layer| doc.add(layer),
        );
        debug!(
            items = items.len(),
            groups = groups.len(),
            width = frame.width,
            height = frame.height;
            "SVG document rendered"
        );

        Ok(document.to_string())
    }

    /// Writes a rendered document to `path`.
    pub fn write_document(&self, document: &str, path: &Path) -> Result<(), Error> {
        info!(path:% = path.display(); "Writing SVG file");
        fs::write(path, document).map_err(|err| {
            error!(path:% = path.display(), err:% = err; "Failed to write SVG file");
            Error::Io(err)
        })
    }

    fn render_boards(&self, frame: &Frame, palette: &Palette) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for row in 0..frame.row_count {
            let board_y = frame.board_y(row);
            output.add_to_layer(
                ShelfLayer::Board,
                Box::new(
                    Rectangle::new()
                        .set("x", MARGIN)
                        .set("y", board_y)
                        .set("width", frame.row_width)
                        .set("height", BOARD_THICKNESS)
                        .set("fill", &palette.board),
                ),
            );
            if self.style.show_labels() {
                output.add_to_layer(
                    ShelfLayer::Label,
                    label(
                        format!("Row {}", row + 1),
                        MARGIN + 4.0,
                        board_y + BOARD_THICKNESS - 1.0,
                        &palette.label,
                    ),
                );
            }
        }
        output
    }

    fn render_items(&self, frame: &Frame, palette: &Palette, items: &[ShelfItem]) -> LayeredOutput {
        let mut series_colors: IndexMap<&SeriesId, &Color> = IndexMap::new();
        let mut output = LayeredOutput::new();

        for item in items {
            // Rows outside the frame cannot be drawn
            if item.row_index() >= frame.row_count {
                continue;
            }
            let fill = match item.series_id() {
                Some(series_id) if !palette.series.is_empty() => {
                    let next = series_colors.len() % palette.series.len();
                    *series_colors
                        .entry(series_id)
                        .or_insert(&palette.series[next])
                }
                _ => &palette.item,
            };

            let rect = frame.geometry.item_rect(item);
            let mut element = frame
                .rectangle(item.row_index(), rect)
                .set("fill", fill)
                .set("stroke", &palette.board)
                .set("stroke-width", 1)
                .set("data-item", item.id().as_str());
            if item.orientation() == Orientation::Unknown {
                element = element.set("stroke-dasharray", "2 2");
            }
            let title = match item.series_id() {
                Some(series_id) => format!("{} ({series_id})", item.id()),
                None => item.id().to_string(),
            };
            let tooltip = Title::new(title);
            output.add_to_layer(ShelfLayer::Item, Box::new(element.add(tooltip)));
        }
        output
    }

    fn render_groups(
        &self,
        frame: &Frame,
        palette: &Palette,
        groups: &[SeriesGroup],
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for group in groups {
            if group.row_index() >= frame.row_count {
                continue;
            }
            let Some(bounds) = group
                .items()
                .iter()
                .map(|item| frame.geometry.item_rect(item))
                .reduce(|acc, rect| {
                    Rect::new(
                        acc.horizontal().merge(&rect.horizontal()),
                        acc.vertical().merge(&rect.vertical()),
                    )
                })
            else {
                continue;
            };

            let outline = frame
                .rectangle(group.row_index(), bounds)
                .set("x", MARGIN + bounds.horizontal().start() - GROUP_INSET)
                .set("width", bounds.horizontal().length() + GROUP_INSET * 2.0)
                .set("fill", "none")
                .set("stroke", &palette.group)
                .set("stroke-width", 2)
                .set("stroke-dasharray", "4 2")
                .set("data-series", group.series_id().as_str());
            output.add_to_layer(ShelfLayer::Group, Box::new(outline));

            if self.style.show_labels() {
                let top = frame.board_y(group.row_index()) - bounds.vertical().end();
                output.add_to_layer(
                    ShelfLayer::Label,
                    label(
                        format!("{} ×{}", group.series_id(), group.len()),
                        MARGIN + bounds.horizontal().start(),
                        top - 3.0,
                        &palette.group,
                    ),
                );
            }
        }
        output
    }
}

/// Page coordinates of a shelf.
struct Frame<'a> {
    geometry: &'a ShelfGeometry,
    row_count: u32,
    row_width: f32,
    row_height: f32,
    width: f32,
    height: f32,
}

impl<'a> Frame<'a> {
    fn new(geometry: &'a ShelfGeometry) -> Self {
        let vertical = geometry.dimensions(Orientation::Vertical).height();
        let horizontal = geometry.dimensions(Orientation::Horizontal).height();
        let row_height = vertical.max(horizontal) + ROW_GAP;
        let row_count = geometry.row_count();
        let row_width = geometry.row_width();

        Self {
            geometry,
            row_count,
            row_width,
            row_height,
            width: row_width + MARGIN * 2.0,
            height: (row_height + BOARD_THICKNESS) * row_count as f32 + MARGIN * 2.0,
        }
    }

    /// Top edge of the board of `row`; items stand on it.
    fn board_y(&self, row: u32) -> f32 {
        MARGIN + (self.row_height + BOARD_THICKNESS) * row as f32 + self.row_height
    }

    fn rectangle(&self, row: u32, rect: Rect) -> Rectangle {
        let board_y = self.board_y(row);
        Rectangle::new()
            .set("x", MARGIN + rect.horizontal().start())
            .set("y", board_y - rect.vertical().end())
            .set("width", rect.horizontal().length())
            .set("height", rect.vertical().length())
    }
}

fn label(text: String, x: f32, y: f32, color: &Color) -> Box<dyn svg::Node> {
    Box::new(
        TextElement::new(text)
            .set("x", x)
            .set("y", y)
            .set("font-size", LABEL_FONT_SIZE)
            .set("font-family", "sans-serif")
            .set("fill", color),
    )
}
