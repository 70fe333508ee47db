//! Layer-based rendering system for SVG output.
//!
//! Drawables do not emit SVG in paint order. They tag each node with a
//! [`RenderLayer`] and [`LayeredOutput::render`] sorts them, so a pool drawn
//! after a task still ends up beneath it.
//!
//! # Example
//!
//! ```
//! # use procanvas_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::Rectangle;
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
//! output.add_to_layer(RenderLayer::Container, Box::new(Rectangle::new()));
//!
//! // Container renders first, then Content
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use std::collections::BTreeMap;

use svg::node::element as svg_element;

/// A boxed SVG node of any element type.
pub type SvgNode = Box<dyn svg::Node>;

/// Paint order of the canvas, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background fill
    Background,
    /// Optional snapping grid
    Grid,
    /// Pools and lanes
    Container,
    /// Connection paths between elements
    Connection,
    /// Flow nodes, data objects and annotations - default layer
    Content,
    /// Labels
    Text,
    /// Selection highlight and the provisional connection line
    Overlay,
}

impl RenderLayer {
    /// Value of the group's `data-layer` attribute.
    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Grid => "grid",
            Self::Container => "container",
            Self::Connection => "connection",
            Self::Content => "content",
            Self::Text => "text",
            Self::Overlay => "overlay",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes keep their insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of nodes placed on `layer`.
    pub fn count_in_layer(&self, layer: RenderLayer) -> usize {
        self.items.iter().filter(|(l, _)| *l == layer).count()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes one `<g data-layer="...">`, bottom layer
    /// first.
    pub fn render(self) -> Vec<SvgNode> {
        let mut groups: BTreeMap<RenderLayer, svg_element::Group> = BTreeMap::new();
        for (layer, node) in self.items {
            let group = groups
                .remove(&layer)
                .unwrap_or_else(|| svg_element::Group::new().set("data-layer", layer.name()));
            groups.insert(layer, group.add(node));
        }
        groups
            .into_values()
            .map(|group| Box::new(group) as SvgNode)
            .collect()
    }
}
