//! Canvas rendering to SVG.
//!
//! [`CanvasRenderer`] redraws the whole canvas from a [`CanvasView`] on every
//! call. It never mutates anything: the view borrows the store contents and
//! the interaction state that matter for drawing.
//!
//! The scene is drawn in diagram coordinates inside a single
//! `<g transform="scale(z)">`, so zoom is purely a display transform.

use std::collections::HashMap;

use log::{debug, warn};
use svg::node::element as svg_element;

use procanvas_core::{
    apply_stroke,
    color::Color,
    draw::{
        Drawable, FlowDefinition, FlowDrawer, Label, LayeredOutput, Node, NodeDefinition,
        RenderLayer, StrokeDefinition, TextDefinition,
    },
    geometry::{Bounds, Insets, Point, Size},
    identifier::ElementId,
    model::{Connection, DiagramElement},
};

use crate::{
    ProcanvasError,
    config::{AppConfig, EditorConfig, ViewConfig},
    interaction::Tool,
    routing,
    store::Snapshot,
};

/// Empty space around the diagram, in diagram units.
const CANVAS_MARGIN: f32 = 40.0;

/// Gap between an element and its selection outline.
const SELECTION_PADDING: f32 = 4.0;

const GRID_PATTERN_ID: &str = "canvas-grid";

/// A connection gesture in progress.
#[derive(Debug, Clone, Copy)]
pub struct PendingConnection<'a> {
    /// The element the gesture started on.
    pub source: &'a ElementId,
    /// Live pointer position in diagram coordinates.
    pub pointer: Point,
}

/// Everything the renderer reads.
#[derive(Debug, Clone, Copy)]
pub struct CanvasView<'a> {
    pub elements: &'a [DiagramElement],
    pub connections: &'a [Connection],
    pub selection: Option<&'a ElementId>,
    pub tool: Tool,
    /// Zoom percentage, 100 being unscaled.
    pub zoom: u32,
    pub show_grid: bool,
    pub grid_size: f32,
    pub pending: Option<PendingConnection<'a>>,
}

impl<'a> CanvasView<'a> {
    /// A view of a stored diagram with nothing selected and no gesture running.
    pub fn from_snapshot(snapshot: &'a Snapshot, config: &AppConfig) -> Self {
        let editor: &EditorConfig = config.editor();
        let view: &ViewConfig = config.view();
        Self {
            elements: &snapshot.elements,
            connections: &snapshot.connections,
            selection: None,
            tool: Tool::Select,
            zoom: view.zoom(),
            show_grid: view.show_grid(),
            grid_size: editor.grid_size(),
            pending: None,
        }
    }

    /// Returns the view with a different zoom percentage.
    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = zoom;
        self
    }

    fn scale(&self) -> f32 {
        self.zoom.max(1) as f32 / 100.0
    }
}

/// Draws a [`CanvasView`] as an SVG document.
#[derive(Debug, Clone)]
pub struct CanvasRenderer {
    nodes: NodeDefinition,
    labels: TextDefinition,
    background: Option<Color>,
    selection_color: Color,
    connection_color: Color,
    grid_color: Color,
}

impl CanvasRenderer {
    /// Creates a renderer styled by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcanvasError::Config`] if a configured color does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ProcanvasError> {
        let style = config.style();
        let connection_color = style.connection_color()?;

        let mut labels = TextDefinition::default();
        if let Some(family) = style.font_family() {
            labels = TextDefinition::new(family, labels.font_size(), labels.color());
        }

        let defaults = NodeDefinition::default();
        let mut nodes = NodeDefinition::new(
            StrokeDefinition::solid(connection_color, defaults.stroke().width()),
            defaults.fill(),
            labels.clone(),
        );
        nodes.set_container_fill(defaults.container_fill());

        Ok(Self {
            nodes,
            labels,
            background: style.background_color()?,
            selection_color: style.selection_color()?,
            connection_color,
            grid_color: Color::new("#e5e7eb").unwrap_or_default(),
        })
    }

    /// Renders the full canvas.
    pub fn render(&self, view: &CanvasView<'_>) -> svg::Document {
        let scale = view.scale();
        let extent = self.extent(view);
        let size = extent.to_size().scale(scale);

        let mut doc = svg::Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height())
            .set("data-tool", view.tool.to_string())
            .set("style", format!("cursor: {}", view.tool.cursor()));

        let mut output = LayeredOutput::new();
        let mut flows = FlowDrawer::new();

        if let Some(background) = self.background {
            let rect = svg_element::Rectangle::new()
                .set("x", extent.min_x())
                .set("y", extent.min_y())
                .set("width", extent.width())
                .set("height", extent.height())
                .set("fill", &background);
            output.add_to_layer(RenderLayer::Background, Box::new(rect));
        }
        if view.show_grid && view.grid_size > 0.0 {
            doc = doc.add(self.grid_pattern(view.grid_size));
            let grid = svg_element::Rectangle::new()
                .set("x", extent.min_x())
                .set("y", extent.min_y())
                .set("width", extent.width())
                .set("height", extent.height())
                .set("fill", format!("url(#{GRID_PATTERN_ID})"));
            output.add_to_layer(RenderLayer::Grid, Box::new(grid));
        }

        for element in view.elements {
            output.merge(self.render_element(element));
        }
        let drawn = self.render_connections(view, &mut flows, &mut output);
        if let Some(selected) = view.selection {
            self.render_selection(view, selected, &mut output);
        }
        if let Some(pending) = view.pending {
            self.render_pending(view, pending, &mut output);
        }

        debug!(
            elements = view.elements.len(),
            connections = drawn,
            zoom = view.zoom;
            "Canvas rendered"
        );

        if flows.marker_count() > 0 {
            doc = doc.add(flows.marker_definitions());
        }

        let mut scene = svg_element::Group::new().set("transform", format!("scale({scale})"));
        let origin = extent.min_point();
        let mut content = svg_element::Group::new();
        if !origin.is_zero() {
            content = content.set(
                "transform",
                format!("translate({}, {})", -origin.x(), -origin.y()),
            );
        }
        for layer in output.render() {
            content = content.add(layer);
        }
        scene = scene.add(content);
        doc.add(scene)
    }

    /// Renders the full canvas to SVG text.
    pub fn render_to_string(&self, view: &CanvasView<'_>) -> String {
        self.render(view).to_string()
    }

    /// The drawn region in diagram coordinates: the origin, every element
    /// and the live pointer, plus a margin on the far sides.
    fn extent(&self, view: &CanvasView<'_>) -> Bounds {
        let mut extent = Bounds::new_from_top_left(Point::default(), Size::default());
        for element in view.elements {
            extent = extent.merge(&element.bounds());
        }
        if let Some(pending) = view.pending {
            extent = extent.merge(&Bounds::new_from_top_left(pending.pointer, Size::default()));
        }
        extent.add_padding(Insets::new(0.0, CANVAS_MARGIN, CANVAS_MARGIN, 0.0))
    }

    fn render_element(&self, element: &DiagramElement) -> LayeredOutput {
        let fill = element.metadata.color.as_deref().and_then(|css| {
            Color::new(css)
                .map_err(|err| {
                    warn!(element:% = element.id, err:%; "Ignoring invalid element color");
                })
                .ok()
        });
        Node::new(&self.nodes, element.kind, &element.name)
            .with_fill(fill)
            .render_to_layers(element.bounds())
    }

    /// Draws every connection whose endpoints exist. Returns how many were drawn.
    fn render_connections(
        &self,
        view: &CanvasView<'_>,
        flows: &mut FlowDrawer,
        output: &mut LayeredOutput,
    ) -> usize {
        let bounds: HashMap<&str, Bounds> = view
            .elements
            .iter()
            .map(|element| (element.id.as_str(), element.bounds()))
            .collect();

        let mut drawn = 0;
        for connection in view.connections {
            let (Some(&source), Some(&target)) = (
                bounds.get(connection.source.as_str()),
                bounds.get(connection.target.as_str()),
            ) else {
                warn!(
                    connection:% = connection.id,
                    source:% = connection.source,
                    target:% = connection.target;
                    "Skipping connection with a missing endpoint"
                );
                continue;
            };

            let route = routing::route_through(source, target, &connection.waypoints);
            let definition = FlowDefinition::for_kind(connection.kind, self.connection_color);
            let path = flows.draw_flow(&definition, &route.path_data());
            let group = svg_element::Group::new()
                .set("data-connection-id", connection.id.as_str())
                .add(path);
            output.add_to_layer(RenderLayer::Connection, Box::new(group));

            if let Some(name) = &connection.name {
                output.merge(Label::new(&self.labels, name).render_at(route.label_position()));
            }
            drawn += 1;
        }
        drawn
    }

    fn render_selection(
        &self,
        view: &CanvasView<'_>,
        selected: &ElementId,
        output: &mut LayeredOutput,
    ) {
        let Some(element) = view.elements.iter().find(|element| element.id == *selected) else {
            return;
        };
        let bounds = element
            .bounds()
            .add_padding(Insets::uniform(SELECTION_PADDING));
        let stroke = StrokeDefinition::dashed(self.selection_color, 2.0);
        let outline = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", "none")
            .set("class", "selection");
        output.add_to_layer(RenderLayer::Overlay, Box::new(apply_stroke!(outline, &stroke)));
    }

    fn render_pending(
        &self,
        view: &CanvasView<'_>,
        pending: PendingConnection<'_>,
        output: &mut LayeredOutput,
    ) {
        let Some(source) = view
            .elements
            .iter()
            .find(|element| element.id == *pending.source)
        else {
            return;
        };
        let start = source.bounds().center();
        let stroke = StrokeDefinition::dashed(self.selection_color, 2.0);
        let line = svg_element::Line::new()
            .set("x1", start.x())
            .set("y1", start.y())
            .set("x2", pending.pointer.x())
            .set("y2", pending.pointer.y())
            .set("class", "connection-preview");
        output.add_to_layer(RenderLayer::Overlay, Box::new(apply_stroke!(line, &stroke)));
    }

    fn grid_pattern(&self, grid_size: f32) -> svg_element::Definitions {
        let lines = svg_element::Path::new()
            .set("d", format!("M {grid_size} 0 L 0 0 0 {grid_size}"))
            .set("fill", "none")
            .set("stroke", self.grid_color.to_string())
            .set("stroke-width", 0.5);
        let pattern = svg_element::Pattern::new()
            .set("id", GRID_PATTERN_ID)
            .set("width", grid_size)
            .set("height", grid_size)
            .set("patternUnits", "userSpaceOnUse")
            .add(lines);
        svg_element::Definitions::new().add(pattern)
    }
}
