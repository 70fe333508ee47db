//! Text rendering for element and connection labels.
//!
//! There is no font shaping here. Labels are wrapped on word boundaries using
//! an average glyph width, which is good enough for the short names process
//! diagrams carry.

use log::trace;
use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{LayeredOutput, RenderLayer},
    geometry::{Bounds, Point},
};

/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.55;

/// Line height as a multiple of the font size.
const LINE_HEIGHT_RATIO: f32 = 1.25;

/// Reusable text style.
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    color: Color,
}

impl TextDefinition {
    pub fn new(font_family: impl Into<String>, font_size: f32, color: Color) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            color,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_RATIO
    }

    /// Estimated width of a single line of `text`.
    pub fn estimate_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * GLYPH_WIDTH_RATIO
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self::new("Arial, sans-serif", 12.0, Color::default())
    }
}

/// A label string together with its style.
///
/// # Examples
///
/// ```
/// # use procanvas_core::draw::{Label, TextDefinition};
/// let style = TextDefinition::default();
/// let label = Label::new(&style, "Review purchase order");
/// assert_eq!(label.wrap(80.0), vec!["Review", "purchase", "order"]);
/// assert_eq!(label.wrap(500.0), vec!["Review purchase order"]);
/// ```
#[derive(Debug, Clone)]
pub struct Label<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Label<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Splits the content into lines no wider than `max_width`.
    ///
    /// Explicit newlines are kept. A single word wider than `max_width` gets
    /// a line of its own rather than being broken.
    pub fn wrap(&self, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in self.content.lines() {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                if self.definition.estimate_width(word) > max_width {
                    trace!(word, max_width; "Word wider than the label, not breaking it");
                }
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if !current.is_empty() && self.definition.estimate_width(&candidate) > max_width {
                    lines.push(std::mem::take(&mut current));
                    current = word.to_string();
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    /// Renders the label centered inside `bounds`, wrapped to its width.
    pub fn render_centered(&self, bounds: Bounds) -> LayeredOutput {
        let lines = self.wrap(bounds.width() - 8.0);
        let block_height = lines.len() as f32 * self.definition.line_height();
        let top = bounds.center().y() - block_height / 2.0;
        self.render_lines(&lines, Point::new(bounds.center().x(), top))
    }

    /// Renders the label horizontally centered just below `bounds`.
    ///
    /// Used for events, gateways and data shapes, whose glyphs are too small
    /// to carry text.
    pub fn render_below(&self, bounds: Bounds) -> LayeredOutput {
        let lines = self.wrap(bounds.width().max(100.0));
        self.render_lines(&lines, Point::new(bounds.center().x(), bounds.max_y() + 4.0))
    }

    /// Renders a single line centered at `center`, used for connection names.
    pub fn render_at(&self, center: Point) -> LayeredOutput {
        let top = center.y() - self.definition.line_height() / 2.0;
        self.render_lines(&[self.content.to_string()], Point::new(center.x(), top))
    }

    fn render_lines(&self, lines: &[String], top_center: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.is_empty() {
            return output;
        }

        let line_height = self.definition.line_height();
        let mut text = svg_element::Text::new("")
            .set("x", top_center.x())
            .set("y", top_center.y())
            .set("text-anchor", "middle")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size())
            .set("fill", self.definition.color().to_string());

        for (index, line) in lines.iter().enumerate() {
            let baseline = top_center.y() + line_height * (index as f32 + 0.8);
            let tspan = svg_element::TSpan::new("")
                .set("x", top_center.x())
                .set("y", baseline)
                .add(SvgText::new(line.as_str()));
            text = text.add(tspan);
        }

        output.add_to_layer(RenderLayer::Text, Box::new(text));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn test_wrap_keeps_explicit_newlines() {
        let style = TextDefinition::default();
        let label = Label::new(&style, "Approve\nInvoice");
        assert_eq!(label.wrap(1000.0), vec!["Approve", "Invoice"]);
    }

    #[test]
    fn test_wrap_overlong_word_gets_own_line() {
        let style = TextDefinition::default();
        let label = Label::new(&style, "a Supercalifragilistic b");
        assert_eq!(label.wrap(20.0), vec!["a", "Supercalifragilistic", "b"]);
    }

    #[test]
    fn test_empty_label_renders_nothing() {
        let style = TextDefinition::default();
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 40.0));
        assert!(Label::new(&style, "  ").render_centered(bounds).is_empty());
    }

    #[test]
    fn test_render_centered_places_text() {
        let style = TextDefinition::default();
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(120.0, 80.0));
        let output = Label::new(&style, "Check stock").render_centered(bounds);
        assert_eq!(output.count_in_layer(RenderLayer::Text), 1);

        let svg = output.render()[0].to_string();
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("Check stock"));
    }
}
