//! Configuration types for the procanvas editor.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! configuration file only needs to mention what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`EditorConfig`] - Grid snapping and history depth.
//! - [`ViewConfig`] - Zoom range and grid visibility.
//! - [`StyleConfig`] - Canvas colors and label font.
//!
//! # Example
//!
//! ```
//! # use procanvas::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.editor().grid_size(), 20.0);
//! assert_eq!(config.editor().history_limit(), 20);
//! assert!(config.validate().is_ok());
//! ```

use std::num::NonZeroUsize;

use serde::Deserialize;

use procanvas_core::color::Color;

use crate::ProcanvasError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    editor: EditorConfig,

    #[serde(default)]
    view: ViewConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(editor: EditorConfig, view: ViewConfig, style: StyleConfig) -> Self {
        Self {
            editor,
            view,
            style,
        }
    }

    /// Returns the editor configuration.
    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    /// Returns the view configuration.
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks values that deserialize fine but make no sense.
    ///
    /// # Errors
    ///
    /// Returns [`ProcanvasError::Config`] for a non-positive grid, a zero
    /// history limit, an empty or inverted zoom range, or a color that does
    /// not parse.
    pub fn validate(&self) -> Result<(), ProcanvasError> {
        if self.editor.grid_size.is_nan() || self.editor.grid_size <= 0.0 {
            return Err(ProcanvasError::Config(format!(
                "grid_size must be positive, got {}",
                self.editor.grid_size
            )));
        }
        if self.editor.history_limit == 0 {
            return Err(ProcanvasError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }
        let view = &self.view;
        if view.min_zoom == 0 || view.min_zoom > view.max_zoom {
            return Err(ProcanvasError::Config(format!(
                "zoom range {}..={} is empty or starts at zero",
                view.min_zoom, view.max_zoom
            )));
        }
        if view.zoom_step == 0 {
            return Err(ProcanvasError::Config(
                "zoom_step must be at least 1".to_string(),
            ));
        }
        self.style.background_color()?;
        self.style.selection_color()?;
        self.style.connection_color()?;
        Ok(())
    }
}

/// Editing behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid unit in diagram coordinates.
    grid_size: f32,

    /// Snap placement and drag positions to the grid.
    snap_to_grid: bool,

    /// Maximum number of history entries kept for undo.
    history_limit: usize,
}

impl EditorConfig {
    pub fn new(grid_size: f32, snap_to_grid: bool, history_limit: usize) -> Self {
        Self {
            grid_size,
            snap_to_grid,
            history_limit,
        }
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// The history limit as a capacity, clamped to at least one entry.
    pub fn history_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.history_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new(20.0, true, 20)
    }
}

/// Zoom and grid display.
///
/// Zoom values are percentages; 100 means unscaled.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    zoom: u32,
    min_zoom: u32,
    max_zoom: u32,
    zoom_step: u32,
    show_grid: bool,
}

impl ViewConfig {
    pub fn new(zoom: u32, min_zoom: u32, max_zoom: u32, zoom_step: u32, show_grid: bool) -> Self {
        Self {
            zoom,
            min_zoom,
            max_zoom,
            zoom_step,
            show_grid,
        }
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn min_zoom(&self) -> u32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    pub fn zoom_step(&self) -> u32 {
        self.zoom_step
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new(100, 25, 200, 10, false)
    }
}

/// Canvas colors and label font. Colors are CSS color strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    selection_color: Option<String>,
    connection_color: Option<String>,
    font_family: Option<String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` for a transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, ProcanvasError> {
        parse_optional_color("background_color", self.background_color.as_deref())
    }

    /// Returns the selection highlight color, blue unless configured.
    pub fn selection_color(&self) -> Result<Color, ProcanvasError> {
        parse_optional_color("selection_color", self.selection_color.as_deref())
            .map(|color| color.unwrap_or_else(|| fallback_color("#2563eb")))
    }

    /// Returns the connection color, near-black unless configured.
    pub fn connection_color(&self) -> Result<Color, ProcanvasError> {
        parse_optional_color("connection_color", self.connection_color.as_deref())
            .map(|color| color.unwrap_or_else(|| fallback_color("#1f2937")))
    }

    /// Returns the configured label font family, if any.
    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }
}

fn parse_optional_color(field: &str, value: Option<&str>) -> Result<Option<Color>, ProcanvasError> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| ProcanvasError::Config(format!("invalid {field} in config: {err}")))
}

fn fallback_color(css: &str) -> Color {
    Color::new(css).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view() {
        let view = ViewConfig::default();
        assert_eq!(view.zoom(), 100);
        assert_eq!(view.min_zoom(), 25);
        assert_eq!(view.max_zoom(), 200);
        assert!(!view.show_grid());
    }

    #[test]
    fn test_history_capacity_clamps_zero() {
        let editor = EditorConfig::new(10.0, false, 0);
        assert_eq!(editor.history_capacity().get(), 1);
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let config = AppConfig::new(
            EditorConfig::new(20.0, true, 0),
            ViewConfig::default(),
            StyleConfig::default(),
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("history_limit"));
    }

    #[test]
    fn test_validate_rejects_bad_grid_and_zoom() {
        let bad_grid = AppConfig::new(
            EditorConfig::new(0.0, true, 20),
            ViewConfig::default(),
            StyleConfig::default(),
        );
        assert!(bad_grid.validate().is_err());

        let bad_zoom = AppConfig::new(
            EditorConfig::default(),
            ViewConfig::new(100, 300, 200, 10, false),
            StyleConfig::default(),
        );
        assert!(bad_zoom.validate().is_err());
    }

    #[test]
    fn test_style_colors() {
        let style = StyleConfig {
            background_color: Some("white".to_string()),
            selection_color: None,
            connection_color: Some("nope".to_string()),
            font_family: None,
        };
        assert!(style.background_color().unwrap().is_some());
        assert!(style.selection_color().is_ok());
        assert!(style.connection_color().is_err());
    }
}
