//! Connection strokes and SVG arrow-head markers.
//!
//! A [`FlowDefinition`] says how one kind of connection looks. The
//! [`FlowDrawer`] draws connection paths and remembers which markers were
//! referenced, so the `<defs>` block only contains markers actually in use.

use std::collections::BTreeMap;

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{StrokeDefinition, SvgNode},
    model::ConnectionKind,
};

/// The head drawn at the target end of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FlowMarker {
    /// Solid triangle
    Filled,
    /// Outlined triangle
    Open,
    /// No head
    None,
}

impl FlowMarker {
    fn name(self) -> &'static str {
        match self {
            Self::Filled => "filled",
            Self::Open => "open",
            Self::None => "none",
        }
    }
}

/// Visual definition of one connection kind.
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    stroke: StrokeDefinition,
    marker: FlowMarker,
}

impl FlowDefinition {
    pub fn new(stroke: StrokeDefinition, marker: FlowMarker) -> Self {
        Self { stroke, marker }
    }

    /// Returns the BPMN look of `kind` drawn in `color`.
    ///
    /// | Kind | Line | Head |
    /// |------|------|------|
    /// | sequence flow | solid | filled |
    /// | message flow | dashed | open |
    /// | association | dotted | none |
    /// | data association | dotted | open |
    pub fn for_kind(kind: ConnectionKind, color: Color) -> Self {
        match kind {
            ConnectionKind::SequenceFlow => {
                Self::new(StrokeDefinition::solid(color, 1.5), FlowMarker::Filled)
            }
            ConnectionKind::MessageFlow => {
                Self::new(StrokeDefinition::dashed(color, 1.5), FlowMarker::Open)
            }
            ConnectionKind::Association => {
                Self::new(StrokeDefinition::dotted(color, 1.5), FlowMarker::None)
            }
            ConnectionKind::DataAssociation => {
                Self::new(StrokeDefinition::dotted(color, 1.5), FlowMarker::Open)
            }
        }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn marker(&self) -> FlowMarker {
        self.marker
    }
}

/// Draws connection paths and collects the markers they reference.
///
/// # Examples
///
/// ```
/// use procanvas_core::{color::Color, draw::{FlowDefinition, FlowDrawer}, model::ConnectionKind};
///
/// let mut drawer = FlowDrawer::new();
/// let definition = FlowDefinition::for_kind(ConnectionKind::SequenceFlow, Color::default());
/// let path = drawer.draw_flow(&definition, "M 0 0 L 100 0");
///
/// assert!(path.to_string().contains("marker-end"));
/// assert_eq!(drawer.marker_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct FlowDrawer {
    markers: BTreeMap<String, (FlowMarker, Color)>,
}

impl FlowDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a connection along the SVG path description `path_data`.
    pub fn draw_flow(&mut self, definition: &FlowDefinition, path_data: &str) -> SvgNode {
        let path = svg_element::Path::new()
            .set("d", path_data)
            .set("fill", "none");
        let mut path = apply_stroke!(path, definition.stroke());

        if definition.marker != FlowMarker::None {
            let color = definition.stroke.color();
            let id = Self::marker_id(definition.marker, color);
            path = path.set("marker-end", format!("url(#{id})"));
            self.markers.insert(id, (definition.marker, color));
        }

        Box::new(path)
    }

    /// Number of distinct markers referenced so far.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Generates the `<defs>` block for every marker referenced so far.
    pub fn marker_definitions(&self) -> SvgNode {
        let mut defs = svg_element::Definitions::new();
        for (id, (marker, color)) in &self.markers {
            defs = defs.add(Self::create_marker(id, *marker, *color));
        }
        Box::new(defs)
    }

    fn marker_id(marker: FlowMarker, color: Color) -> String {
        format!("flow-{}-{}", marker.name(), color.to_id_safe_string())
    }

    fn create_marker(id: &str, marker: FlowMarker, color: Color) -> svg_element::Marker {
        let head = svg_element::Path::new()
            .set("d", "M 0 0 L 10 5 L 0 10 z")
            .set("stroke", color.to_string())
            .set("stroke-width", 1);
        let head = match marker {
            FlowMarker::Open => head.set("fill", "white"),
            _ => head
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
        };

        svg_element::Marker::new()
            .set("id", id)
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 8)
            .set("markerHeight", 8)
            .set("orient", "auto")
            .add(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::StrokeStyle;

    #[test]
    fn test_for_kind_styles() {
        let color = Color::default();
        let message = FlowDefinition::for_kind(ConnectionKind::MessageFlow, color);
        assert_eq!(message.stroke().style(), StrokeStyle::Dashed);
        assert_eq!(message.marker(), FlowMarker::Open);

        let association = FlowDefinition::for_kind(ConnectionKind::Association, color);
        assert_eq!(association.stroke().style(), StrokeStyle::Dotted);
        assert_eq!(association.marker(), FlowMarker::None);
    }

    #[test]
    fn test_association_has_no_marker() {
        let mut drawer = FlowDrawer::new();
        let definition = FlowDefinition::for_kind(ConnectionKind::Association, Color::default());
        let path = drawer.draw_flow(&definition, "M 0 0 L 10 10");
        assert!(!path.to_string().contains("marker-end"));
        assert_eq!(drawer.marker_count(), 0);
    }

    #[test]
    fn test_markers_are_deduplicated_per_color_and_kind() {
        let mut drawer = FlowDrawer::new();
        let black = Color::default();
        let red = Color::new("red").unwrap();

        let sequence = FlowDefinition::for_kind(ConnectionKind::SequenceFlow, black);
        drawer.draw_flow(&sequence, "M 0 0 L 1 1");
        drawer.draw_flow(&sequence, "M 2 2 L 3 3");
        assert_eq!(drawer.marker_count(), 1);

        drawer.draw_flow(&FlowDefinition::for_kind(ConnectionKind::SequenceFlow, red), "M 0 0 L 1 1");
        drawer.draw_flow(&FlowDefinition::for_kind(ConnectionKind::MessageFlow, black), "M 0 0 L 1 1");
        assert_eq!(drawer.marker_count(), 3);

        let defs = drawer.marker_definitions().to_string();
        assert_eq!(defs.matches("<marker").count(), 3);
    }
}
