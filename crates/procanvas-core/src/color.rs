//! Color handling for procanvas diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Element metadata stores colors as free-form CSS
//! strings; they are parsed here right before rendering.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parses a CSS color string such as `#ff0000`, `rgb(255, 0, 0)` or `red`.
    ///
    /// # Examples
    ///
    /// ```
    /// use procanvas_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a sanitized, ID-safe string representation of this color.
    ///
    /// The result is suitable for SVG `id` attributes (marker definitions).
    /// It contains only alphanumeric characters and underscores and always
    /// starts with a letter.
    ///
    /// # Examples
    ///
    /// ```
    /// use procanvas_core::color::Color;
    ///
    /// let color = Color::new("#ff8000").unwrap();
    /// let id_str = color.to_id_safe_string();
    /// assert!(id_str.chars().all(|c| c.is_alphanumeric() || c == '_'));
    /// ```
    pub fn to_id_safe_string(self) -> String {
        let color_str = self.to_string();
        let mut sanitized = color_str
            .replace('#', "hex")
            .replace(['(', ')', ',', ' ', ';', '.', '%'], "_");

        if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            sanitized = format!("c_{sanitized}");
        }

        sanitized
    }

    /// Returns the alpha (transparency) component of this color, 0.0 to 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("rgb(10, 20, 30)").is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.unwrap_err().contains("not-a-color"));
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_alpha() {
        assert!((Color::new("red").unwrap().alpha() - 1.0).abs() < 0.001);
        assert!((Color::new("rgba(0, 0, 0, 0.25)").unwrap().alpha() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_color_to_id_safe_string() {
        let safe_id = Color::new("#ff0000").unwrap().to_id_safe_string();
        assert!(!safe_id.contains('#'));
        assert!(!safe_id.contains('('));
        assert!(!safe_id.contains(' '));
        assert!(safe_id.chars().next().unwrap().is_ascii_alphabetic());
    }

    #[test]
    fn test_metadata_color_strings() {
        for css in ["#fef3c7", "lightblue", "rgb(37, 99, 235)"] {
            let color = Color::new(css).unwrap();
            assert!(
                color
                    .to_id_safe_string()
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_'),
                "{css}"
            );
        }
    }
}
