//! Interaction state machine.
//!
//! Pointer events and commands arrive at the [`Editor`] and are translated
//! into store mutations here. The transient gesture state is the closed
//! [`InteractionState`] enum, so it is impossible to be dragging and
//! connecting at the same time.
//!
//! Transitions, keyed by current state, event and active tool:
//!
//! | State | Event | Tool | Result |
//! |-------|-------|------|--------|
//! | idle | down on element | select, move | dragging, element selected |
//! | dragging | move | any | element follows pointer, no history entry |
//! | dragging | up | any | idle, one history entry if the element moved |
//! | idle | down on element | connector | connecting from that element |
//! | connecting | down on other element | connector | new connection, idle, tool back to select |
//! | connecting | down on source | connector | ignored |
//! | connecting | down on background | any | idle, nothing created |
//! | idle | down on background | placement | new element placed and selected, tool stays |
//! | idle | down on background | other | selection cleared, tool back to select |
//! | idle | down | hand | panning until up, nothing mutated |
//!
//! Pointer coordinates are screen coordinates; they are divided by the zoom
//! scale before hit-testing so the machine always works in diagram space.

use std::{fmt, str::FromStr};

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use procanvas_core::{
    geometry::Point,
    identifier::{ConnectionId, ElementId},
    model::{ConnectionKind, ElementKind},
};

use crate::editor::{Editor, ElementPatch};

/// Error returned when parsing an unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool `{0}`")]
pub struct UnknownToolError(String);

/// The active palette tool.
///
/// Tools serialize as strings: `select`, `move`, `hand`,
/// `connector:<connection-kind>` and `place:<element-kind>`. A bare
/// `connector` means a sequence flow connector and a bare element kind
/// such as `task` means the placement tool for it.
///
/// # Examples
///
/// ```
/// # use procanvas::interaction::Tool;
/// # use procanvas_core::model::{ConnectionKind, ElementKind};
/// assert_eq!("task".parse(), Ok(Tool::Place(ElementKind::Task)));
/// assert_eq!("connector".parse(), Ok(Tool::Connector(ConnectionKind::SequenceFlow)));
/// assert_eq!(Tool::Place(ElementKind::Gateway).to_string(), "place:gateway");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tool {
    #[default]
    Select,
    Move,
    Hand,
    Connector(ConnectionKind),
    Place(ElementKind),
}

impl Tool {
    /// Returns true for tools that place a new element on a background click.
    pub fn is_placement(self) -> bool {
        matches!(self, Self::Place(_))
    }

    /// CSS cursor shown on the canvas while this tool is active.
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Select => "default",
            Self::Move => "move",
            Self::Hand => "grab",
            Self::Connector(_) | Self::Place(_) => "crosshair",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => f.write_str("select"),
            Self::Move => f.write_str("move"),
            Self::Hand => f.write_str("hand"),
            Self::Connector(kind) => write!(f, "connector:{kind}"),
            Self::Place(kind) => write!(f, "place:{kind}"),
        }
    }
}

impl FromStr for Tool {
    type Err = UnknownToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownToolError(s.to_string());
        match s {
            "select" => Ok(Self::Select),
            "move" => Ok(Self::Move),
            "hand" => Ok(Self::Hand),
            "connector" => Ok(Self::Connector(ConnectionKind::default())),
            _ => {
                if let Some(kind) = s.strip_prefix("connector:") {
                    kind.parse().map(Self::Connector).map_err(|_| unknown())
                } else {
                    s.strip_prefix("place:")
                        .unwrap_or(s)
                        .parse()
                        .map(Self::Place)
                        .map_err(|_| unknown())
                }
            }
        }
    }
}

impl TryFrom<String> for Tool {
    type Error = UnknownToolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tool> for String {
    fn from(tool: Tool) -> Self {
        tool.to_string()
    }
}

/// The gesture currently in progress.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    /// An element follows the pointer. `offset` is the pointer position
    /// relative to the element's top-left corner when the drag started.
    DraggingElement {
        element: ElementId,
        offset: Point,
        moved: bool,
    },
    /// The first click of a connect gesture landed on `source`.
    Connecting { source: ElementId },
    /// The hand tool is held down. Nothing in the store changes.
    Panning { origin: Point },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name used in logs and the rendered document.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DraggingElement { .. } => "dragging-element",
            Self::Connecting { .. } => "connecting",
            Self::Panning { .. } => "panning",
        }
    }
}

/// Keyboard and toolbar commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorAction {
    Delete,
    Duplicate,
    Undo,
    Redo,
    /// Abandons a pending connection or drag.
    Cancel,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleGrid,
    ClearCanvas,
}

/// One input to the editor, as recorded in a replay script.
///
/// # Examples
///
/// ```
/// # use procanvas::interaction::EditorInput;
/// let inputs: Vec<EditorInput> = serde_json::from_str(r#"[
///     {"type": "select-tool", "tool": "task"},
///     {"type": "click", "x": 300, "y": 160},
///     {"type": "action", "action": "undo"}
/// ]"#).unwrap();
/// assert_eq!(inputs.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EditorInput {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// Pointer down immediately followed by pointer up at the same spot.
    Click { x: f32, y: f32 },
    SelectTool { tool: Tool },
    Action { action: EditorAction },
    UpdateElement { id: ElementId, patch: ElementPatch },
    RenameConnection { id: ConnectionId, name: Option<String> },
    DeleteConnection { id: ConnectionId },
}

impl Editor {
    /// Feeds one input into the editor.
    pub fn handle(&mut self, input: EditorInput) {
        match input {
            EditorInput::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            EditorInput::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            EditorInput::PointerUp { x, y } => self.pointer_up(Point::new(x, y)),
            EditorInput::Click { x, y } => {
                self.pointer_down(Point::new(x, y));
                self.pointer_up(Point::new(x, y));
            }
            EditorInput::SelectTool { tool } => self.select_tool(tool),
            EditorInput::Action { action } => self.apply(action),
            EditorInput::UpdateElement { id, patch } => {
                self.update_element(&id, &patch);
            }
            EditorInput::RenameConnection { id, name } => {
                self.rename_connection(&id, name);
            }
            EditorInput::DeleteConnection { id } => {
                self.delete_connection(&id);
            }
        }
    }

    /// Runs a keyboard or toolbar command.
    pub fn apply(&mut self, action: EditorAction) {
        debug!(action:?; "Editor action");
        match action {
            EditorAction::Delete => {
                self.delete_selected();
            }
            EditorAction::Duplicate => {
                self.duplicate_selected();
            }
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::Cancel => self.cancel(),
            EditorAction::ZoomIn => self.zoom_in(),
            EditorAction::ZoomOut => self.zoom_out(),
            EditorAction::ResetZoom => self.reset_zoom(),
            EditorAction::ToggleGrid => self.toggle_grid(),
            EditorAction::ClearCanvas => self.clear_canvas(),
        }
    }

    /// Handles a pointer press at `screen`.
    pub fn pointer_down(&mut self, screen: Point) {
        let point = self.to_diagram(screen);
        self.pointer = Some(point);

        // A press without a release for the previous gesture ends that gesture first.
        if matches!(
            self.state,
            InteractionState::DraggingElement { .. } | InteractionState::Panning { .. }
        ) {
            self.finish_gesture();
        }

        // Placement tools drop elements into pools and lanes.
        let placing = self.tool.is_placement();
        let hit = self
            .store
            .hit_test(point)
            .filter(|element| !(placing && element.kind.is_container()))
            .map(|element| (element.id.clone(), element.position()));

        if let InteractionState::Connecting { source } = &self.state {
            let source = source.clone();
            match hit {
                Some((target, _)) if target == source => {
                    debug!(source:%; "Ignoring self-connection");
                }
                Some((target, _)) => {
                    let kind = match self.tool {
                        Tool::Connector(kind) => kind,
                        _ => ConnectionKind::default(),
                    };
                    self.connect(&source, &target, kind);
                    self.state = InteractionState::Idle;
                    self.tool = Tool::Select;
                }
                None => {
                    debug!(source:%; "Pending connection cancelled");
                    self.reset_to_idle();
                }
            }
            return;
        }

        match (self.tool, hit) {
            (Tool::Hand, _) => {
                self.state = InteractionState::Panning { origin: point };
            }
            (Tool::Select | Tool::Move, Some((element, position))) => {
                self.selection = Some(element.clone());
                self.state = InteractionState::DraggingElement {
                    element,
                    offset: point.sub_point(position),
                    moved: false,
                };
            }
            (Tool::Connector(_), Some((element, _))) => {
                self.state = InteractionState::Connecting { source: element };
            }
            (Tool::Place(_), Some((element, _))) => {
                self.selection = Some(element);
            }
            (Tool::Place(kind), None) => {
                let id = self.place_element(kind, point);
                self.selection = Some(id);
            }
            (Tool::Select | Tool::Move | Tool::Connector(_), None) => {
                self.reset_to_idle();
            }
        }
        debug!(state = self.state.name(), tool:% = self.tool; "Pointer down");
    }

    /// Handles pointer movement to `screen`.
    pub fn pointer_move(&mut self, screen: Point) {
        let point = self.to_diagram(screen);
        self.pointer = Some(point);

        let InteractionState::DraggingElement {
            element, offset, ..
        } = &self.state
        else {
            return;
        };
        let element = element.clone();
        let position = self.snap(point.sub_point(*offset));

        let mut snapshot = self.store.snapshot().clone();
        let Some(target) = snapshot.element_mut(&element) else {
            // Removed underneath the drag, e.g. by undo.
            self.state = InteractionState::Idle;
            return;
        };
        if target.position() == position {
            return;
        }
        target.set_position(position);
        self.store.replace(snapshot);

        if let InteractionState::DraggingElement { moved, .. } = &mut self.state {
            *moved = true;
        }
        trace!(element:%, x = position.x(), y = position.y(); "Drag move");
    }

    /// Handles a pointer release at `screen`.
    pub fn pointer_up(&mut self, screen: Point) {
        self.pointer = Some(self.to_diagram(screen));
        self.finish_gesture();
    }

    /// Abandons a pending connection or drag.
    ///
    /// A drag that already moved its element is rolled back to the last
    /// committed state.
    pub fn cancel(&mut self) {
        if let InteractionState::DraggingElement { moved: true, .. } = self.state {
            self.store.replace(self.history.current().clone());
        }
        self.state = InteractionState::Idle;
    }

    /// Ends a drag or pan. Only a drag that moved its element commits.
    fn finish_gesture(&mut self) {
        match std::mem::take(&mut self.state) {
            InteractionState::DraggingElement {
                element,
                moved: true,
                ..
            } => {
                debug!(element:%; "Drag finished");
                let snapshot = self.store.snapshot().clone();
                self.commit(snapshot);
            }
            InteractionState::Connecting { source } => {
                // Connecting spans two presses; releases leave it alone.
                self.state = InteractionState::Connecting { source };
            }
            _ => {}
        }
    }

    fn reset_to_idle(&mut self) {
        self.state = InteractionState::Idle;
        self.selection = None;
        self.tool = Tool::Select;
    }

    fn to_diagram(&self, screen: Point) -> Point {
        let scale = self.zoom_scale();
        Point::new(screen.x() / scale, screen.y() / scale)
    }
}
