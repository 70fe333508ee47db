//! Procanvas - the editing core of a BPMN-style process diagram editor.
//!
//! The crate holds everything between user input and pixels:
//!
//! - [`store`] - The element/connection store and its snapshots
//! - [`history`] - Bounded linear undo/redo over snapshots
//! - [`routing`] - Anchor selection and path shapes for connections
//! - [`interaction`] - Tools, gesture state and pointer handling
//! - [`editor`] - The [`Editor`] facade tying the above together
//! - [`render`] - SVG rendering of the canvas
//! - [`export`] - JSON and XML export and import
//! - [`validate`] - Lint-style diagram checks
//!
//! # Examples
//!
//! ```
//! use procanvas::{Editor, config::AppConfig, interaction::Tool, render::CanvasRenderer};
//! use procanvas_core::{geometry::Point, model::ElementKind};
//!
//! let config = AppConfig::default();
//! let mut editor = Editor::new(&config);
//!
//! editor.select_tool(Tool::Place(ElementKind::StartEvent));
//! editor.pointer_down(Point::new(100.0, 140.0));
//! editor.pointer_up(Point::new(100.0, 140.0));
//! assert_eq!(editor.store().elements().len(), 1);
//!
//! let svg = CanvasRenderer::new(&config).unwrap().render_to_string(&editor.view());
//! assert!(svg.contains("<svg"));
//! ```

pub mod config;
pub mod editor;
pub mod export;
pub mod history;
pub mod interaction;
pub mod render;
pub mod routing;
pub mod sample;
pub mod store;
pub mod validate;

mod error;

pub use procanvas_core::{color, draw, geometry, identifier, model};

pub use editor::Editor;
pub use error::{ExportError, ImportError, ProcanvasError};

use log::info;

use config::AppConfig;
use render::{CanvasRenderer, CanvasView};
use store::Snapshot;

/// Renders a stored diagram to SVG text.
///
/// `zoom` overrides the configured zoom percentage.
///
/// # Errors
///
/// Returns [`ProcanvasError::Config`] if a configured style color is invalid.
pub fn render_svg(
    snapshot: &Snapshot,
    config: &AppConfig,
    zoom: Option<u32>,
) -> Result<String, ProcanvasError> {
    let renderer = CanvasRenderer::new(config)?;
    let mut view = CanvasView::from_snapshot(snapshot, config);
    if let Some(zoom) = zoom {
        view = view.with_zoom(zoom);
    }
    let svg = renderer.render_to_string(&view);
    info!(
        elements = snapshot.elements.len(),
        connections = snapshot.connections.len(),
        zoom = view.zoom;
        "Rendered diagram"
    );
    Ok(svg)
}
