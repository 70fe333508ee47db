//! The editor facade.
//!
//! [`Editor`] owns one diagram session: the store, its history, the id
//! generator and the interaction state. Every committed mutation builds the
//! next [`Snapshot`], swaps it into the store and records it in history in the
//! same call, so the two never disagree outside of an ongoing drag.
//!
//! None of the editing operations fail. Calls that make no sense for the
//! current diagram, such as deleting with nothing selected, return `false`
//! or `None` and change nothing.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use procanvas_core::{
    geometry::Point,
    identifier::{ConnectionId, ElementId, IdGenerator},
    model::{Connection, ConnectionKind, DiagramElement, ElementKind},
};

use crate::{
    config::{AppConfig, EditorConfig, ViewConfig},
    error::ImportError,
    export,
    history::HistoryStack,
    interaction::{InteractionState, Tool},
    render::{CanvasView, PendingConnection},
    store::{DiagramStore, Snapshot},
};

/// Offset applied to a duplicated element, in diagram units on both axes.
pub const DUPLICATE_OFFSET: f32 = 20.0;

/// Prefix of connection ids.
const CONNECTION_ID_PREFIX: &str = "flow";

/// A partial update of an element's name and metadata.
///
/// `None` leaves a field alone. For metadata fields an empty string clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub implementation: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

impl ElementPatch {
    /// Sets the element's name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Applies the patch, returning whether anything changed.
    pub fn apply_to(&self, element: &mut DiagramElement) -> bool {
        let mut changed = false;
        if let Some(name) = &self.name {
            if element.name != *name {
                element.name.clone_from(name);
                changed = true;
            }
        }

        let metadata = &mut element.metadata;
        let fields = [
            (&self.documentation, &mut metadata.documentation),
            (&self.assignee, &mut metadata.assignee),
            (&self.due_date, &mut metadata.due_date),
            (&self.implementation, &mut metadata.implementation),
            (&self.description, &mut metadata.description),
            (&self.color, &mut metadata.color),
        ];
        for (patch, field) in fields {
            let Some(value) = patch else {
                continue;
            };
            let value = (!value.is_empty()).then(|| value.clone());
            if *field != value {
                *field = value;
                changed = true;
            }
        }
        changed
    }
}

/// One diagram editing session.
#[derive(Debug)]
pub struct Editor {
    pub(crate) store: DiagramStore,
    pub(crate) history: HistoryStack,
    ids: IdGenerator,
    pub(crate) tool: Tool,
    pub(crate) selection: Option<ElementId>,
    pub(crate) state: InteractionState,
    /// Last pointer position in diagram coordinates.
    pub(crate) pointer: Option<Point>,
    zoom: u32,
    show_grid: bool,
    editor_config: EditorConfig,
    view_config: ViewConfig,
}

impl Editor {
    /// Creates an editor with an empty diagram.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_snapshot(config, Snapshot::default())
    }

    /// Creates an editor for an existing diagram.
    pub fn with_snapshot(config: &AppConfig, snapshot: Snapshot) -> Self {
        let editor_config = config.editor().clone();
        let view_config = config.view().clone();
        let zoom = initial_zoom(&view_config);
        Self {
            history: HistoryStack::with_capacity(
                snapshot.clone(),
                editor_config.history_capacity(),
            ),
            store: DiagramStore::new(snapshot),
            ids: IdGenerator::new(),
            tool: Tool::default(),
            selection: None,
            state: InteractionState::Idle,
            pointer: None,
            zoom,
            show_grid: view_config.show_grid(),
            editor_config,
            view_config,
        }
    }

    pub fn store(&self) -> &DiagramStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn selection(&self) -> Option<&ElementId> {
        self.selection.as_ref()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Last known pointer position in diagram coordinates.
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Zoom as a percentage.
    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    /// Zoom as a scale factor, 1.0 at 100%.
    pub fn zoom_scale(&self) -> f32 {
        self.zoom.max(1) as f32 / 100.0
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn grid_size(&self) -> f32 {
        self.editor_config.grid_size()
    }

    /// Replaces the whole diagram and starts a fresh history.
    pub fn load(&mut self, snapshot: Snapshot) {
        info!(
            elements = snapshot.elements.len(),
            connections = snapshot.connections.len();
            "Loading diagram"
        );
        self.history =
            HistoryStack::with_capacity(snapshot.clone(), self.editor_config.history_capacity());
        self.store.replace(snapshot);
        self.selection = None;
        self.state = InteractionState::Idle;
    }

    /// Loads a diagram from its JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Json`] for malformed input. The current
    /// diagram is left untouched on failure.
    pub fn import_json(&mut self, json: &str) -> Result<(), ImportError> {
        let snapshot = export::from_json(json)?;
        self.load(snapshot);
        Ok(())
    }

    /// Imports an XML document.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::NotXml`] if the text lacks an XML declaration.
    /// The current diagram is left untouched on failure.
    pub fn import_xml(&mut self, xml: &str) -> Result<(), ImportError> {
        let snapshot = export::from_xml(xml)?;
        self.load(snapshot);
        Ok(())
    }

    /// Switches the active tool, abandoning any gesture in progress.
    pub fn select_tool(&mut self, tool: Tool) {
        if !self.state.is_idle() {
            self.cancel();
        }
        debug!(tool:%; "Tool selected");
        self.tool = tool;
    }

    /// Selects an element, or clears the selection for an unknown id.
    pub fn select(&mut self, id: Option<&ElementId>) {
        self.selection = id
            .filter(|id| self.store.element(id).is_some())
            .cloned();
    }

    /// Places a new element of `kind` with its top-left corner at `position`.
    ///
    /// The position is snapped to the grid when snapping is enabled.
    pub fn place_element(&mut self, kind: ElementKind, position: Point) -> ElementId {
        let position = self.snap(position);
        let mut snapshot = self.store.snapshot().clone();
        let id = self
            .ids
            .next_element_id(kind.id_prefix(), |candidate| snapshot.is_id_taken(candidate));
        snapshot
            .elements
            .push(DiagramElement::new(id.clone(), kind, position));

        debug!(element:% = id, kind:%, x = position.x(), y = position.y(); "Element placed");
        self.commit(snapshot);
        id
    }

    /// Connects `source` to `target`.
    ///
    /// Returns `None` without changing anything for a self-connection or an
    /// endpoint that does not exist.
    pub fn connect(
        &mut self,
        source: &ElementId,
        target: &ElementId,
        kind: ConnectionKind,
    ) -> Option<ConnectionId> {
        if source == target
            || self.store.element(source).is_none()
            || self.store.element(target).is_none()
        {
            return None;
        }

        let mut snapshot = self.store.snapshot().clone();
        let id = self
            .ids
            .next_connection_id(CONNECTION_ID_PREFIX, |candidate| snapshot.is_id_taken(candidate));
        snapshot.connections.push(Connection::new(
            id.clone(),
            source.clone(),
            target.clone(),
            kind,
        ));

        debug!(connection:% = id, source:%, target:%, kind:%; "Connection created");
        self.commit(snapshot);
        Some(id)
    }

    /// Deletes the selected element and every connection touching it.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection.clone() {
            Some(id) => self.delete_element(&id),
            None => false,
        }
    }

    /// Deletes an element and every connection touching it.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        let mut snapshot = self.store.snapshot().clone();
        if !snapshot.remove_element_cascade(id) {
            return false;
        }
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
        if !self.state.is_idle() {
            self.state = InteractionState::Idle;
        }

        debug!(element:% = id; "Element deleted");
        self.commit(snapshot);
        true
    }

    /// Duplicates the selected element and selects the copy.
    pub fn duplicate_selected(&mut self) -> Option<ElementId> {
        let id = self.selection.clone()?;
        self.duplicate_element(&id)
    }

    /// Copies an element under a fresh id, offset by [`DUPLICATE_OFFSET`].
    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<ElementId> {
        let mut snapshot = self.store.snapshot().clone();
        let original = snapshot.element(id)?;

        let copy_id = self
            .ids
            .next_element_id(original.kind.id_prefix(), |candidate| {
                snapshot.is_id_taken(candidate)
            });
        let mut copy = original.clone();
        copy.id = copy_id.clone();
        copy.set_position(
            original
                .position()
                .add_point(Point::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET)),
        );
        snapshot.elements.push(copy);

        debug!(element:% = id, copy:% = copy_id; "Element duplicated");
        self.selection = Some(copy_id.clone());
        self.commit(snapshot);
        Some(copy_id)
    }

    /// Updates an element's name and metadata.
    ///
    /// Commits only when the patch changed something.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let mut snapshot = self.store.snapshot().clone();
        let Some(element) = snapshot.element_mut(id) else {
            return false;
        };
        if !patch.apply_to(element) {
            return false;
        }

        debug!(element:% = id; "Element updated");
        self.commit(snapshot);
        true
    }

    /// Moves an element's top-left corner to `position`, snapped when enabled.
    pub fn move_element(&mut self, id: &ElementId, position: Point) -> bool {
        let position = self.snap(position);
        let mut snapshot = self.store.snapshot().clone();
        let Some(element) = snapshot.element_mut(id) else {
            return false;
        };
        if element.position() == position {
            return false;
        }
        element.set_position(position);

        debug!(element:% = id, x = position.x(), y = position.y(); "Element moved");
        self.commit(snapshot);
        true
    }

    /// Sets or clears a connection's name. An empty name clears it.
    pub fn rename_connection(&mut self, id: &ConnectionId, name: Option<String>) -> bool {
        let name = name.filter(|name| !name.is_empty());
        let mut snapshot = self.store.snapshot().clone();
        let Some(connection) = snapshot.connection_mut(id) else {
            return false;
        };
        if connection.name == name {
            return false;
        }
        connection.name = name;

        debug!(connection:% = id; "Connection renamed");
        self.commit(snapshot);
        true
    }

    /// Removes a single connection.
    pub fn delete_connection(&mut self, id: &ConnectionId) -> bool {
        let mut snapshot = self.store.snapshot().clone();
        let before = snapshot.connections.len();
        snapshot.connections.retain(|connection| connection.id != *id);
        if snapshot.connections.len() == before {
            return false;
        }

        debug!(connection:% = id; "Connection deleted");
        self.commit(snapshot);
        true
    }

    /// Removes every element and connection.
    pub fn clear_canvas(&mut self) {
        self.state = InteractionState::Idle;
        self.selection = None;
        if self.store.snapshot().is_empty() {
            return;
        }
        debug!("Canvas cleared");
        self.commit(Snapshot::default());
    }

    /// Steps back in history. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Steps forward in history. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + self.view_config.zoom_step()).min(self.view_config.max_zoom());
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self
            .zoom
            .saturating_sub(self.view_config.zoom_step())
            .max(self.view_config.min_zoom());
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = initial_zoom(&self.view_config);
    }

    pub fn toggle_grid(&mut self) {
        self.show_grid = !self.show_grid;
    }

    /// A read-only view for the canvas renderer.
    pub fn view(&self) -> CanvasView<'_> {
        let pending = match (&self.state, self.pointer) {
            (InteractionState::Connecting { source }, Some(pointer)) => Some(PendingConnection {
                source,
                pointer,
            }),
            _ => None,
        };
        CanvasView {
            elements: self.store.elements(),
            connections: self.store.connections(),
            selection: self.selection.as_ref(),
            tool: self.tool,
            zoom: self.zoom,
            show_grid: self.show_grid,
            grid_size: self.editor_config.grid_size(),
            pending,
        }
    }

    pub(crate) fn snap(&self, point: Point) -> Point {
        if self.editor_config.snap_to_grid() {
            point.snap_to_grid(self.editor_config.grid_size())
        } else {
            point
        }
    }

    pub(crate) fn commit(&mut self, snapshot: Snapshot) {
        // A drag interrupted by another edit is folded into that edit's entry.
        if matches!(self.state, InteractionState::DraggingElement { .. }) {
            self.state = InteractionState::Idle;
        }
        self.store.replace(snapshot.clone());
        self.history.commit(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.store.replace(snapshot);
        self.state = InteractionState::Idle;
        let selection_gone = self
            .selection
            .as_ref()
            .is_some_and(|selection| self.store.element(selection).is_none());
        if selection_gone {
            self.selection = None;
        }
        debug!(cursor = self.history.cursor(), len = self.history.len(); "History restored");
    }
}

/// The configured zoom, kept inside the configured range.
fn initial_zoom(view: &ViewConfig) -> u32 {
    let max = view.max_zoom().max(view.min_zoom());
    view.zoom().clamp(view.min_zoom(), max)
}
