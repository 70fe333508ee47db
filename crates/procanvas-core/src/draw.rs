//! Visual definitions for diagram nodes and flows.
//!
//! Everything here turns model data plus a style into SVG nodes sorted into
//! [`RenderLayer`]s. Nothing in this module knows about selection, tools or
//! history; the canvas renderer in the `procanvas` crate decides what to draw.

mod flow;
mod layer;
mod node;
mod stroke;
mod text;

pub use flow::{FlowDefinition, FlowDrawer, FlowMarker};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use node::{Node, NodeDefinition};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeStyle};
pub use text::{Label, TextDefinition};

use crate::geometry::Bounds;

/// A trait for types that can be drawn into a rectangle on the canvas.
pub trait Drawable: std::fmt::Debug {
    /// Renders the drawable into `bounds`, which are given in diagram coordinates.
    fn render_to_layers(&self, bounds: Bounds) -> LayeredOutput;
}
