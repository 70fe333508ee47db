//! Stroke definitions for shape outlines and connection lines.
//!
//! The [`apply_stroke!`](crate::apply_stroke!) macro writes a
//! [`StrokeDefinition`] onto an SVG element in one go.

use crate::color::Color;

/// Dash pattern of a stroke.
///
/// Message flows and selection outlines are dashed, associations dotted,
/// everything else solid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// The SVG `stroke-dasharray` value, `None` for solid lines.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("6,4"),
            Self::Dotted => Some("2,3"),
        }
    }
}

/// How line ends are drawn. Dotted lines need round caps to show dots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
}

impl StrokeCap {
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

/// Color, width and pattern of a line.
///
/// # Examples
///
/// ```
/// use procanvas_core::{color::Color, draw::{StrokeCap, StrokeDefinition, StrokeStyle}};
///
/// let stroke = StrokeDefinition::dotted(Color::new("blue").unwrap(), 1.5);
/// assert_eq!(stroke.style(), StrokeStyle::Dotted);
/// assert_eq!(stroke.cap(), StrokeCap::Round);
/// ```
#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
    cap: StrokeCap,
}

impl StrokeDefinition {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
            cap: StrokeCap::Butt,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self::solid(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn dotted(color: Color, width: f32) -> Self {
        Self::solid(color, width)
            .with_style(StrokeStyle::Dotted)
            .with_cap(StrokeCap::Round)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::solid(Color::default(), 1.0)
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// # Examples
///
/// ```
/// use procanvas_core::draw::StrokeDefinition;
/// use procanvas_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::solid(Color::new("black").unwrap(), 2.0);
/// let rect = svg_element::Rectangle::new().set("width", 100).set("height", 50);
///
/// let rect = procanvas_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value());

        if let Some(dasharray) = $stroke.style().dasharray() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use svg::node::element as svg_element;

    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.cap(), StrokeCap::Butt);
    }

    #[test]
    fn test_stroke_constructors() {
        let color = Color::new("red").unwrap();

        assert_eq!(StrokeDefinition::solid(color, 2.0).style(), StrokeStyle::Solid);
        assert_eq!(StrokeDefinition::dashed(color, 1.5).style(), StrokeStyle::Dashed);
        assert_eq!(StrokeDefinition::dashed(color, 1.5).with_width(3.0).width(), 3.0);

        let dotted = StrokeDefinition::dotted(color, 1.0);
        assert_eq!(dotted.style(), StrokeStyle::Dotted);
        assert_eq!(dotted.cap(), StrokeCap::Round);
    }

    #[test]
    fn test_apply_stroke_sets_dasharray_only_when_patterned() {
        let solid = StrokeDefinition::solid(Color::default(), 2.0);
        let line = crate::apply_stroke!(svg_element::Line::new(), &solid);
        assert!(!line.to_string().contains("stroke-dasharray"));

        let dashed = StrokeDefinition::dashed(Color::default(), 2.0);
        let line = crate::apply_stroke!(svg_element::Line::new(), &dashed);
        assert!(line.to_string().contains("stroke-dasharray=\"6,4\""));

        let dotted = StrokeDefinition::dotted(Color::default(), 1.0);
        let line = crate::apply_stroke!(svg_element::Line::new(), &dotted);
        assert!(line.to_string().contains("stroke-linecap=\"round\""));
    }
}
