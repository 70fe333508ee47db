//! Node shapes for every [`ElementKind`].

use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, Label, LayeredOutput, RenderLayer, StrokeDefinition, TextDefinition},
    geometry::{Bounds, Point},
    model::ElementKind,
};

/// Width of the vertical header band on the left of pools and lanes.
const CONTAINER_HEADER_WIDTH: f32 = 30.0;

/// Corner radius of task and subprocess rectangles.
const ACTIVITY_CORNER_RADIUS: f32 = 10.0;

/// Shared style for all nodes on a canvas.
#[derive(Debug, Clone)]
pub struct NodeDefinition {
    stroke: StrokeDefinition,
    fill: Color,
    container_fill: Color,
    text: TextDefinition,
}

impl NodeDefinition {
    pub fn new(stroke: StrokeDefinition, fill: Color, text: TextDefinition) -> Self {
        Self {
            stroke,
            fill,
            container_fill: fill,
            text,
        }
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    /// Fill used for pools and lanes.
    pub fn container_fill(&self) -> Color {
        self.container_fill
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }

    pub fn set_container_fill(&mut self, color: Color) {
        self.container_fill = color;
    }
}

impl Default for NodeDefinition {
    fn default() -> Self {
        let mut definition = Self::new(
            StrokeDefinition::solid(Color::new("#1f2937").expect("valid CSS color"), 2.0),
            Color::new("white").expect("valid CSS color"),
            TextDefinition::default(),
        );
        definition.set_container_fill(Color::new("#f9fafb").expect("valid CSS color"));
        definition
    }
}

/// A diagram element ready to be drawn.
///
/// # Examples
///
/// ```
/// use procanvas_core::{
///     draw::{Drawable, Node, NodeDefinition, RenderLayer},
///     geometry::{Bounds, Point, Size},
///     model::ElementKind,
/// };
///
/// let definition = NodeDefinition::default();
/// let node = Node::new(&definition, ElementKind::Gateway, "Approved?");
/// let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(50.0, 50.0));
///
/// let output = node.render_to_layers(bounds);
/// assert_eq!(output.count_in_layer(RenderLayer::Text), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Node<'a> {
    definition: &'a NodeDefinition,
    kind: ElementKind,
    label: &'a str,
    fill: Option<Color>,
}

impl<'a> Node<'a> {
    pub fn new(definition: &'a NodeDefinition, kind: ElementKind, label: &'a str) -> Self {
        Self {
            definition,
            kind,
            label,
            fill: None,
        }
    }

    /// Overrides the fill color taken from the definition.
    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    fn fill(&self) -> Color {
        self.fill.unwrap_or(if self.kind.is_container() {
            self.definition.container_fill
        } else {
            self.definition.fill
        })
    }

    fn stroke_with_width(&self, width: f32) -> StrokeDefinition {
        self.definition.stroke.clone().with_width(width)
    }

    fn render_event(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let center = bounds.center();
        let radius = bounds.width().min(bounds.height()) / 2.0;
        let width = match self.kind {
            ElementKind::EndEvent => 4.0,
            _ => 2.0,
        };

        let circle = svg_element::Circle::new()
            .set("cx", center.x())
            .set("cy", center.y())
            .set("r", radius)
            .set("fill", self.fill().to_string());
        output.add_to_layer(
            RenderLayer::Content,
            Box::new(apply_stroke!(circle, &self.stroke_with_width(width))),
        );

        if self.kind == ElementKind::IntermediateEvent {
            let inner = svg_element::Circle::new()
                .set("cx", center.x())
                .set("cy", center.y())
                .set("r", (radius - 3.0).max(1.0))
                .set("fill", "none");
            output.add_to_layer(
                RenderLayer::Content,
                Box::new(apply_stroke!(inner, &self.stroke_with_width(1.5))),
            );
        }
    }

    fn render_activity(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", ACTIVITY_CORNER_RADIUS)
            .set("fill", self.fill().to_string());
        output.add_to_layer(
            RenderLayer::Content,
            Box::new(apply_stroke!(rect, self.definition.stroke())),
        );

        let marker_origin = bounds.min_point().add_point(Point::new(14.0, 14.0));
        match self.kind {
            ElementKind::UserTask => {
                let head = svg_element::Circle::new()
                    .set("cx", marker_origin.x())
                    .set("cy", marker_origin.y() - 3.0)
                    .set("r", 3.5)
                    .set("fill", "none");
                let body = svg_element::Path::new()
                    .set(
                        "d",
                        format!(
                            "M {} {} Q {} {} {} {}",
                            marker_origin.x() - 6.0,
                            marker_origin.y() + 7.0,
                            marker_origin.x(),
                            marker_origin.y() - 2.0,
                            marker_origin.x() + 6.0,
                            marker_origin.y() + 7.0
                        ),
                    )
                    .set("fill", "none");
                let thin = self.stroke_with_width(1.0);
                output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(head, &thin)));
                output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(body, &thin)));
            }
            ElementKind::ServiceTask => {
                let gear = svg_element::Circle::new()
                    .set("cx", marker_origin.x())
                    .set("cy", marker_origin.y())
                    .set("r", 6.0)
                    .set("fill", "none")
                    .set("stroke-dasharray", "3,2");
                let hub = svg_element::Circle::new()
                    .set("cx", marker_origin.x())
                    .set("cy", marker_origin.y())
                    .set("r", 2.5)
                    .set("fill", "none");
                let thin = self.stroke_with_width(2.0);
                output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(gear, &thin)));
                output.add_to_layer(
                    RenderLayer::Content,
                    Box::new(apply_stroke!(hub, &self.stroke_with_width(1.0))),
                );
            }
            ElementKind::Subprocess => {
                let size = 14.0;
                let box_x = bounds.center().x() - size / 2.0;
                let box_y = bounds.max_y() - size - 4.0;
                let expand = svg_element::Rectangle::new()
                    .set("x", box_x)
                    .set("y", box_y)
                    .set("width", size)
                    .set("height", size)
                    .set("fill", "none");
                let plus = svg_element::Path::new().set(
                    "d",
                    format!(
                        "M {} {} L {} {} M {} {} L {} {}",
                        box_x + 3.0,
                        box_y + size / 2.0,
                        box_x + size - 3.0,
                        box_y + size / 2.0,
                        box_x + size / 2.0,
                        box_y + 3.0,
                        box_x + size / 2.0,
                        box_y + size - 3.0
                    ),
                );
                let thin = self.stroke_with_width(1.0);
                output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(expand, &thin)));
                output.add_to_layer(RenderLayer::Content, Box::new(apply_stroke!(plus, &thin)));
            }
            _ => {}
        }
    }

    fn render_gateway(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let center = bounds.center();
        let half_w = bounds.width() / 2.0;
        let half_h = bounds.height() / 2.0;
        let diamond = svg_element::Polygon::new()
            .set(
                "points",
                format!(
                    "{},{} {},{} {},{} {},{}",
                    center.x(),
                    bounds.min_y(),
                    bounds.max_x(),
                    center.y(),
                    center.x(),
                    bounds.max_y(),
                    bounds.min_x(),
                    center.y()
                ),
            )
            .set("fill", self.fill().to_string());
        output.add_to_layer(
            RenderLayer::Content,
            Box::new(apply_stroke!(diamond, self.definition.stroke())),
        );

        let arm_x = half_w * 0.35;
        let arm_y = half_h * 0.35;
        let marker: Option<Box<dyn svg::Node>> = match self.kind {
            ElementKind::Gateway => {
                let cross = svg_element::Path::new().set(
                    "d",
                    format!(
                        "M {} {} L {} {} M {} {} L {} {}",
                        center.x() - arm_x,
                        center.y() - arm_y,
                        center.x() + arm_x,
                        center.y() + arm_y,
                        center.x() + arm_x,
                        center.y() - arm_y,
                        center.x() - arm_x,
                        center.y() + arm_y
                    ),
                );
                Some(Box::new(apply_stroke!(cross, &self.stroke_with_width(3.0))))
            }
            ElementKind::ParallelGateway => {
                let plus = svg_element::Path::new().set(
                    "d",
                    format!(
                        "M {} {} L {} {} M {} {} L {} {}",
                        center.x() - arm_x,
                        center.y(),
                        center.x() + arm_x,
                        center.y(),
                        center.x(),
                        center.y() - arm_y,
                        center.x(),
                        center.y() + arm_y
                    ),
                );
                Some(Box::new(apply_stroke!(plus, &self.stroke_with_width(3.0))))
            }
            ElementKind::InclusiveGateway => {
                let ring = svg_element::Circle::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("r", arm_x.min(arm_y) * 1.2)
                    .set("fill", "none");
                Some(Box::new(apply_stroke!(ring, &self.stroke_with_width(2.5))))
            }
            _ => None,
        };
        if let Some(marker) = marker {
            output.add_to_layer(RenderLayer::Content, marker);
        }
    }

    fn render_data_object(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let fold = (bounds.width() * 0.3).min(12.0);
        let page = svg_element::Path::new()
            .set(
                "d",
                format!(
                    "M {x0} {y0} L {xf} {y0} L {x1} {yf} L {x1} {y1} L {x0} {y1} Z M {xf} {y0} L {xf} {yf} L {x1} {yf}",
                    x0 = bounds.min_x(),
                    y0 = bounds.min_y(),
                    x1 = bounds.max_x(),
                    y1 = bounds.max_y(),
                    xf = bounds.max_x() - fold,
                    yf = bounds.min_y() + fold,
                ),
            )
            .set("fill", self.fill().to_string());
        output.add_to_layer(
            RenderLayer::Content,
            Box::new(apply_stroke!(page, &self.stroke_with_width(1.5))),
        );
    }

    fn render_data_store(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let ry = (bounds.height() * 0.12).max(2.0);
        let rx = bounds.width() / 2.0;
        let cylinder = svg_element::Path::new()
            .set(
                "d",
                format!(
                    "M {x0} {top} A {rx} {ry} 0 0 0 {x1} {top} A {rx} {ry} 0 0 0 {x0} {top} L {x0} {bottom} A {rx} {ry} 0 0 0 {x1} {bottom} L {x1} {top}",
                    x0 = bounds.min_x(),
                    x1 = bounds.max_x(),
                    top = bounds.min_y() + ry,
                    bottom = bounds.max_y() - ry,
                ),
            )
            .set("fill", self.fill().to_string());
        output.add_to_layer(
            RenderLayer::Content,
            Box::new(apply_stroke!(cylinder, &self.stroke_with_width(1.5))),
        );
    }

    fn render_container(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let rect = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", self.fill().to_string());
        let band_x = bounds.min_x() + CONTAINER_HEADER_WIDTH;
        let band = svg_element::Line::new()
            .set("x1", band_x)
            .set("y1", bounds.min_y())
            .set("x2", band_x)
            .set("y2", bounds.max_y());
        let width = if self.kind == ElementKind::Pool { 2.0 } else { 1.0 };
        let stroke = self.stroke_with_width(width);
        output.add_to_layer(RenderLayer::Container, Box::new(apply_stroke!(rect, &stroke)));
        output.add_to_layer(RenderLayer::Container, Box::new(apply_stroke!(band, &stroke)));

        if self.label.trim().is_empty() {
            return;
        }
        let text_style = self.definition.text();
        let cx = bounds.min_x() + CONTAINER_HEADER_WIDTH / 2.0;
        let cy = bounds.center().y();
        let text = svg_element::Text::new("")
            .set("x", cx)
            .set("y", cy)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", text_style.font_family())
            .set("font-size", text_style.font_size())
            .set("fill", text_style.color().to_string())
            .set("transform", format!("rotate(-90 {cx} {cy})"))
            .add(SvgText::new(self.label));
        output.add_to_layer(RenderLayer::Text, Box::new(text));
    }

    fn render_annotation(&self, bounds: Bounds, output: &mut LayeredOutput) {
        let bracket = svg_element::Path::new()
            .set(
                "d",
                format!(
                    "M {} {} L {} {} L {} {} L {} {}",
                    bounds.min_x() + 12.0,
                    bounds.min_y(),
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.min_x(),
                    bounds.max_y(),
                    bounds.min_x() + 12.0,
                    bounds.max_y()
                ),
            )
            .set("fill", "none");
        output.add_to_layer(
            RenderLayer::Content,
            Box::new(apply_stroke!(bracket, &self.stroke_with_width(1.0))),
        );
    }
}

impl Drawable for Node<'_> {
    fn render_to_layers(&self, bounds: Bounds) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let label = Label::new(self.definition.text(), self.label);

        match self.kind {
            ElementKind::StartEvent | ElementKind::IntermediateEvent | ElementKind::EndEvent => {
                self.render_event(bounds, &mut output);
                output.merge(label.render_below(bounds));
            }
            ElementKind::Task
            | ElementKind::UserTask
            | ElementKind::ServiceTask
            | ElementKind::Subprocess => {
                self.render_activity(bounds, &mut output);
                output.merge(label.render_centered(bounds));
            }
            ElementKind::Gateway | ElementKind::ParallelGateway | ElementKind::InclusiveGateway => {
                self.render_gateway(bounds, &mut output);
                output.merge(label.render_below(bounds));
            }
            ElementKind::DataObject => {
                self.render_data_object(bounds, &mut output);
                output.merge(label.render_below(bounds));
            }
            ElementKind::DataStore => {
                self.render_data_store(bounds, &mut output);
                output.merge(label.render_below(bounds));
            }
            ElementKind::Pool | ElementKind::Lane => {
                self.render_container(bounds, &mut output);
            }
            ElementKind::TextAnnotation => {
                self.render_annotation(bounds, &mut output);
                output.merge(label.render_centered(bounds));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn bounds_for(kind: ElementKind) -> Bounds {
        Bounds::new_from_top_left(Point::new(100.0, 100.0), kind.default_size())
    }

    fn render(kind: ElementKind, label: &str) -> String {
        let definition = NodeDefinition::default();
        Node::new(&definition, kind, label)
            .render_to_layers(bounds_for(kind))
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect()
    }

    #[test]
    fn test_every_kind_renders_something() {
        let definition = NodeDefinition::default();
        for kind in ElementKind::ALL {
            let output = Node::new(&definition, kind, "").render_to_layers(bounds_for(kind));
            assert!(!output.is_empty(), "{kind} rendered nothing");
        }
    }

    #[test]
    fn test_events_are_circles() {
        let svg = render(ElementKind::StartEvent, "Start");
        assert!(svg.contains("<circle"));
        assert!(svg.contains("r=\"18\""));
    }

    #[test]
    fn test_end_event_has_thick_border() {
        let svg = render(ElementKind::EndEvent, "");
        assert!(svg.contains("stroke-width=\"4\""));
    }

    #[test]
    fn test_gateway_is_diamond() {
        let svg = render(ElementKind::Gateway, "");
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("points=\"125,100 150,125 125,150 100,125\""));
    }

    #[test]
    fn test_containers_render_on_container_layer() {
        let definition = NodeDefinition::default();
        let output = Node::new(&definition, ElementKind::Pool, "Customer")
            .render_to_layers(bounds_for(ElementKind::Pool));
        assert_eq!(output.count_in_layer(RenderLayer::Container), 2);
        assert_eq!(output.count_in_layer(RenderLayer::Content), 0);
        assert_eq!(output.count_in_layer(RenderLayer::Text), 1);
    }

    #[test]
    fn test_fill_override() {
        let definition = NodeDefinition::default();
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(120.0, 80.0));
        let fill = Color::new("#ffeeaa").unwrap();
        let svg: String = Node::new(&definition, ElementKind::Task, "Pay")
            .with_fill(Some(fill))
            .render_to_layers(bounds)
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();
        assert!(svg.contains(&format!("fill=\"{fill}\"")));
    }
}
