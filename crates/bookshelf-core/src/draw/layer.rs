//! Layer-based SVG output for shelf previews.
//!
//! Preview elements are painted in a fixed order regardless of the order in
//! which they are produced: boards first, then books, then series group
//! outlines, then labels.
//!
//! # Example
//!
//! ```
//! # use bookshelf_core::draw::{LayeredOutput, ShelfLayer};
//! # use svg::node::element::{Rectangle, Text};
//! let mut output = LayeredOutput::new();
//!
//! output.add_to_layer(ShelfLayer::Label, Box::new(Text::new("Row 1")));
//! output.add_to_layer(ShelfLayer::Board, Box::new(Rectangle::new()));
//!
//! // Board group renders before the label group
//! let groups = output.render();
//! assert_eq!(groups.len(), 2);
//! ```

use svg::node::element::Group;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Paint order of shelf preview elements, bottom to top.
///
/// `Ord` follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShelfLayer {
    /// Shelf boards and the background
    Board,
    /// Book rectangles
    Item,
    /// Outlines around adjacent same-series books
    Group,
    /// Row and item labels
    Label,
}

impl ShelfLayer {
    /// Returns the value written to the `data-layer` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Item => "item",
            Self::Group => "group",
            Self::Label => "label",
        }
    }
}

/// SVG nodes tagged with the layer they belong to.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    nodes: Vec<(ShelfLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to a layer. Nodes keep insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: ShelfLayer, node: SvgNode) {
        self.nodes.push((layer, node));
    }

    /// Moves every node of `other` into this output.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.nodes.extend(other.nodes);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consumes the output and returns one `<g data-layer=…>` per non-empty
    /// layer, in paint order.
    pub fn render(mut self) -> Vec<SvgNode> {
        self.nodes.sort_by_key(|(layer, _)| *layer);

        let mut groups: Vec<SvgNode> = Vec::new();
        let mut current: Option<(ShelfLayer, Group)> = None;

        for (layer, node) in self.nodes {
            current = match current {
                Some((current_layer, group)) if current_layer == layer => {
                    Some((layer, group.add(node)))
                }
                previous => {
                    if let Some((_, group)) = previous {
                        groups.push(Box::new(group));
                    }
                    let group = Group::new().set("data-layer", layer.name()).add(node);
                    Some((layer, group))
                }
            };
        }

        if let Some((_, group)) = current {
            groups.push(Box::new(group));
        }

        groups
    }
}
